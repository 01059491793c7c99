//! Integration tests for hierarchical collections and item templates.

use autoui::{
    ActionMarker, AutoUi, CollectionMarker, ItemSource, MemberInfo, PropertyMarker, TypeInfo,
    ValueType, ViewModel, ViewRoot,
};
use autoui_widgets::{ControlType, Value, WidgetNode, WidgetProperty, WidgetTree};
use once_cell::sync::Lazy;

static NODE: Lazy<TypeInfo> = Lazy::new(|| {
    TypeInfo::new("Node")
        .member(
            MemberInfo::property("label", ValueType::Text)
                .read_only()
                .with(PropertyMarker::new()),
        )
        .member(MemberInfo::method("rename").with(ActionMarker::new()))
        .member(MemberInfo::property("note", ValueType::Bool))
        .member(
            MemberInfo::property("children", nodes_type())
                .with(CollectionMarker::new().selected_index("picked")),
        )
});

static OUTLINE: Lazy<TypeInfo> = Lazy::new(|| {
    TypeInfo::new("Outline")
        .member(
            MemberInfo::property("roots", nodes_type())
                .with(CollectionMarker::new().selected_index("selected").caption("Outline")),
        )
        .member(
            MemberInfo::property("pinned", nodes_type())
                .with(CollectionMarker::new().selected_index("pinned_index")),
        )
});

fn node_info() -> &'static TypeInfo {
    &NODE
}

fn nodes_type() -> ValueType {
    ValueType::Collection {
        item: node_info,
        hierarchical: true,
    }
}

#[derive(Default)]
struct Nodes(Vec<Node>);

impl ItemSource for Nodes {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn item(&self, index: usize) -> Option<&dyn ViewModel> {
        self.0.item(index)
    }

    fn children(&self, index: usize) -> Option<&dyn ItemSource> {
        self.0.get(index).map(|n| &n.children as &dyn ItemSource)
    }
}

#[derive(Default)]
struct Node {
    label: String,
    children: Nodes,
}

impl Node {
    fn new(label: &str, children: Vec<Node>) -> Self {
        Self {
            label: label.to_owned(),
            children: Nodes(children),
        }
    }
}

impl ViewModel for Node {
    fn type_info(&self) -> &'static TypeInfo {
        &NODE
    }

    fn get(&self, member: &str) -> Value {
        match member {
            "label" => Value::from(self.label.as_str()),
            _ => Value::Null,
        }
    }

    fn items(&self, member: &str) -> Option<&dyn ItemSource> {
        (member == "children").then_some(&self.children as &dyn ItemSource)
    }
}

#[derive(Default)]
struct Outline {
    roots: Nodes,
    pinned: Nodes,
    selected: i64,
}

impl ViewModel for Outline {
    fn type_info(&self) -> &'static TypeInfo {
        &OUTLINE
    }

    fn get(&self, member: &str) -> Value {
        match member {
            "selected" => Value::Int(self.selected),
            _ => Value::Null,
        }
    }

    fn set(&mut self, member: &str, value: Value) -> bool {
        match (member, value.as_int()) {
            ("selected", Some(index)) => {
                self.selected = index;
                true
            }
            _ => false,
        }
    }

    fn items(&self, member: &str) -> Option<&dyn ItemSource> {
        match member {
            "roots" => Some(&self.roots),
            "pinned" => Some(&self.pinned),
            _ => None,
        }
    }
}

fn outline() -> Outline {
    Outline {
        roots: Nodes(vec![
            Node::new("a", vec![Node::new("a1", Vec::new()), Node::new("a2", Vec::new())]),
            Node::new("b", Vec::new()),
        ]),
        pinned: Nodes(vec![Node::new("p", Vec::new())]),
        selected: 1,
    }
}

fn setup() -> (AutoUi, WidgetTree, autoui_widgets::WidgetId) {
    let mut tree = WidgetTree::new();
    let parent = tree.add_root(WidgetNode::new(ControlType::Panel));
    (AutoUi::default(), tree, parent)
}

#[test]
fn test_template_compiled_once_per_item_type() {
    let (ui, mut tree, parent) = setup();
    let output = ui.builder().build(&mut tree, parent, &OUTLINE).unwrap();

    assert_eq!(output.records.len(), 2);
    assert_eq!(output.templates.len(), 1);
    assert_eq!(output.templates.compilations(), 1);

    let template = output.templates.get("Node").unwrap();
    assert_eq!(template.record_count(), 3);
    assert_eq!(template.bindings().len(), 3);
    assert!(!tree.is_visible(template.root()));
}

#[test]
fn test_template_holder_sits_under_first_list_only() {
    let (ui, mut tree, parent) = setup();
    let output = ui.builder().build(&mut tree, parent, &OUTLINE).unwrap();

    let roots = tree.children(output.root)[0];
    let pinned = tree.children(output.root)[1];
    assert_eq!(tree.get(roots).unwrap().control, ControlType::TreeView);
    assert_eq!(tree.get(roots).unwrap().caption(), Some("Outline"));
    assert_eq!(tree.children(roots).len(), 1);
    assert!(tree.children(pinned).is_empty());

    let holder = output.templates.get("Node").unwrap().holder();
    assert_eq!(tree.parent(holder), Some(roots));
}

#[test]
fn test_bind_counts_rows_and_selection() {
    let (ui, mut tree, parent) = setup();
    let root = ViewRoot::new(Box::new(outline()));
    let view = ui.build_view(&mut tree, parent, &root, &[]).unwrap();

    let roots = tree.children(view.root)[0];
    let node = tree.get(roots).unwrap();
    assert_eq!(node.property(WidgetProperty::Items), Some(&Value::Int(4)));
    assert_eq!(node.property(WidgetProperty::SelectedIndex), Some(&Value::Int(1)));

    view.commit(&mut tree, roots, WidgetProperty::SelectedIndex, Value::Int(3), &root)
        .unwrap();
    assert_eq!(root.with(|m| m.get("selected")), Value::Int(3));
}

#[test]
fn test_realize_rows_binds_each_item() {
    let (ui, mut tree, parent) = setup();
    let root = ViewRoot::new(Box::new(outline()));
    let mut view = ui.build_view(&mut tree, parent, &root, &[]).unwrap();
    let roots = tree.children(view.root)[0];

    let rows = view.realize_rows(&mut tree, roots, &root).unwrap();

    let paths: Vec<Vec<usize>> = rows.iter().map(|(path, _)| path.clone()).collect();
    assert_eq!(paths, vec![vec![0], vec![0, 0], vec![0, 1], vec![1]]);
    assert_eq!(view.templates.compilations(), 1);

    let labels: Vec<Value> = rows
        .iter()
        .map(|(_, row)| {
            let label = tree.children(row.root)[0];
            tree.get(label).unwrap().property(WidgetProperty::Text).cloned().unwrap()
        })
        .collect();
    assert_eq!(
        labels,
        vec![
            Value::from("a"),
            Value::from("a1"),
            Value::from("a2"),
            Value::from("b")
        ]
    );

    for (_, row) in &rows {
        assert_eq!(row.bindings.len(), 3);
        assert!(row.bindings.scopes().iter().all(|s| s.initialized));
        assert!(tree.is_visible(row.root));
        assert_eq!(tree.parent(row.root), Some(roots));
    }

    let first_children = tree.children(rows[0].1.root)[2];
    assert_eq!(
        tree.get(first_children).unwrap().property(WidgetProperty::Items),
        Some(&Value::Int(2))
    );
}

#[test]
fn test_realize_rows_rejects_flat_widgets() {
    let (ui, mut tree, parent) = setup();
    let root = ViewRoot::new(Box::new(outline()));
    let mut view = ui.build_view(&mut tree, parent, &root, &[]).unwrap();
    let flat = view.root;

    assert!(view.realize_rows(&mut tree, flat, &root).is_err());
}

#[test]
fn test_realize_rows_replaces_earlier_rows() {
    let (ui, mut tree, parent) = setup();
    let root = ViewRoot::new(Box::new(outline()));
    let mut view = ui.build_view(&mut tree, parent, &root, &[]).unwrap();
    let roots = tree.children(view.root)[0];

    let first = view.realize_rows(&mut tree, roots, &root).unwrap();
    let widgets = tree.len();
    let second = view.realize_rows(&mut tree, roots, &root).unwrap();

    assert_eq!(second.len(), 4);
    assert_eq!(tree.children(roots).len(), 1 + 4);
    assert_eq!(tree.len(), widgets);
    for (_, row) in &first {
        assert!(tree.get(row.root).is_none());
    }
    for (_, row) in &second {
        assert_eq!(tree.parent(row.root), Some(roots));
    }
}
