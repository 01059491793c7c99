//! # Widget Builder
//!
//! Walks a view-model *type* depth-first and synthesizes a widget tree plus
//! one [`RegistrationRecord`] per bindable member.
//!
//! ```text
//! caller parent
//! └── wrapper panel            (BuildOutput::root, paths start here)
//!     ├── [0] Save button      record /0        member path ""
//!     ├── [1] panel "details"  layout group, no record
//!     │   └── [0] name editor  record /1/0      member path "details"
//!     └── [2] rows list        record /2        template compiled once
//! ```
//!
//! Every widget is created suppressed and listed in
//! [`BuildOutput::hidden`]; the binder reveals them.

mod panel_stack;

use autoui_widgets::{
    ControlPath, ControlType, PanelLayout, Sizing, Value, WidgetFlags, WidgetId, WidgetNode,
    WidgetProperty, WidgetTree,
};

pub use panel_stack::LayoutPanelStack;

use crate::binder::Binder;
use crate::error::{AutoUiResult, ConfigurationError, Diagnostic};
use crate::metadata::{
    MemberInfo, MetadataResolver, ProceduralInvoke, PropertyMode, RenderKind, ResolvedMember,
    TypeInfo, TypeRef,
};
use crate::model::MemberPath;
use crate::registry::ControlRegistry;
use crate::template::{ItemTemplate, TemplateLibrary};

/// Leading control-path segments dropped from recorded paths.
///
/// The only dropped segment is the wrapper panel's index under the caller's
/// parent, so recorded paths resolve from [`BuildOutput::root`].
pub const CONTROL_PATH_SKIP: usize = 1;

/// Deferred binding instruction for one member.
#[derive(Debug, Clone)]
pub struct RegistrationRecord {
    /// Widget location below the wrapper panel.
    pub control_path: ControlPath,
    /// Widget position among its siblings.
    pub sibling_index: usize,
    /// Control kind created.
    pub control: ControlType,
    /// Sub-view-model owning the member.
    pub member_path: MemberPath,
    /// Type declaring the member.
    pub owner: &'static TypeInfo,
    /// The member.
    pub member: &'static MemberInfo,
    /// Render classification.
    pub render: RenderKind,
}

impl RegistrationRecord {
    /// `Type.member` key.
    #[must_use]
    pub fn binding_key(&self) -> String {
        format!("{}.{}", self.owner.name, self.member.name)
    }
}

/// Result of one build pass.
#[derive(Debug)]
pub struct BuildOutput {
    /// Wrapper panel holding the generated widgets.
    pub root: WidgetId,
    /// Registration records in creation order.
    pub records: Vec<RegistrationRecord>,
    /// Widgets hidden until bind.
    pub hidden: Vec<WidgetId>,
    /// Item templates compiled during the pass.
    pub templates: TemplateLibrary,
    /// Non-fatal problems.
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildOutput {
    /// Records of members declared directly on the root type.
    pub fn top_level_records(&self) -> impl Iterator<Item = &RegistrationRecord> {
        self.records.iter().filter(|r| r.member_path.is_empty())
    }
}

/// Position of the walk.
#[derive(Debug, Clone)]
struct BuildContext {
    panel: WidgetId,
    control_path: ControlPath,
    member_path: MemberPath,
    owner: &'static TypeInfo,
}

/// Synthesizes widget trees from view-model types.
///
/// A builder may be reused; each outermost [`Builder::build`] starts from a
/// clean state.
pub struct Builder<'r> {
    resolver: &'r MetadataResolver,
    panels: LayoutPanelStack,
    procedural: Vec<(BuildContext, &'static str)>,
    records: Vec<RegistrationRecord>,
    hidden: Vec<WidgetId>,
    templates: TemplateLibrary,
    diagnostics: Vec<Diagnostic>,
    visiting: Vec<&'static str>,
}

impl<'r> Builder<'r> {
    /// Creates a builder.
    #[must_use]
    pub fn new(resolver: &'r MetadataResolver) -> Self {
        Self {
            resolver,
            panels: LayoutPanelStack::new(),
            procedural: Vec::new(),
            records: Vec::new(),
            hidden: Vec::new(),
            templates: TemplateLibrary::default(),
            diagnostics: Vec::new(),
            visiting: Vec::new(),
        }
    }

    /// Registry used to create widgets.
    #[must_use]
    pub fn registry(&self) -> &'r ControlRegistry {
        self.resolver.registry()
    }

    /// Number of open panels.
    #[must_use]
    pub fn panel_depth(&self) -> usize {
        self.panels.depth()
    }

    /// Panel new widgets go into.
    #[must_use]
    pub fn current_panel(&self) -> Option<WidgetId> {
        self.panels.current()
    }

    /// Adds a hidden widget to the current panel.
    ///
    /// For use by builder-configuring procedural members. The widget is
    /// revealed together with the generated ones.
    pub fn add_control(&mut self, tree: &mut WidgetTree, mut node: WidgetNode) -> Option<WidgetId> {
        let panel = self.panels.current()?;
        node.flags.set(WidgetFlags::SUPPRESSED);
        let id = tree.add_child(panel, node);
        self.hidden.push(id);
        Some(id)
    }

    /// Builds the widgets for `info` under `parent`.
    ///
    /// # Errors
    ///
    /// Called from a builder-configuring procedural member, the pass is
    /// nested: its records, hidden widgets and diagnostics join the
    /// enclosing pass, member paths continue from the procedural member's
    /// owner, and the returned output carries only the new wrapper root.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AutoUiError::Configuration`] if a member carries an
    /// invalid marker. Widgets created before the error stay in the tree and
    /// should be discarded by the caller.
    pub fn build(
        &mut self,
        tree: &mut WidgetTree,
        parent: WidgetId,
        info: &'static TypeInfo,
    ) -> AutoUiResult<BuildOutput> {
        if let Some((enclosing, member)) = self.procedural.last().cloned() {
            return self.run_nested(tree, parent, info, &enclosing, member);
        }
        self.templates = TemplateLibrary::default();
        self.run(tree, parent, info)
    }

    fn reset(&mut self) {
        self.panels.clear();
        self.procedural.clear();
        self.records.clear();
        self.hidden.clear();
        self.diagnostics.clear();
        self.visiting.clear();
    }

    fn run(
        &mut self,
        tree: &mut WidgetTree,
        parent: WidgetId,
        info: &'static TypeInfo,
    ) -> AutoUiResult<BuildOutput> {
        self.reset();

        let root = self.add_wrapper(tree, parent, info);
        let ctx = BuildContext {
            panel: root,
            control_path: ControlPath::root().child(tree.children(parent).len() - 1),
            member_path: MemberPath::root(),
            owner: info,
        };

        self.visiting.push(info.name);
        let result = self.within_panel(root, |b| b.build_members(tree, &ctx));
        self.visiting.pop();
        result?;

        tracing::debug!(
            type_name = info.name,
            records = self.records.len(),
            widgets = self.hidden.len(),
            "built widget tree"
        );

        Ok(BuildOutput {
            root,
            records: std::mem::take(&mut self.records),
            hidden: std::mem::take(&mut self.hidden),
            templates: std::mem::take(&mut self.templates),
            diagnostics: std::mem::take(&mut self.diagnostics),
        })
    }

    fn run_nested(
        &mut self,
        tree: &mut WidgetTree,
        parent: WidgetId,
        info: &'static TypeInfo,
        enclosing: &BuildContext,
        member: &'static str,
    ) -> AutoUiResult<BuildOutput> {
        if self.visiting.contains(&info.name) {
            return Err(ConfigurationError::RecursiveLayoutGroup {
                type_name: info.name,
                member,
            }
            .into());
        }

        let base = match tree.path_from(enclosing.panel, parent) {
            Some(relative) => relative
                .segments()
                .iter()
                .fold(enclosing.control_path.clone(), |path, &index| path.child(index)),
            None => {
                tracing::warn!(
                    type_name = info.name,
                    member,
                    "nested build outside its procedural container"
                );
                enclosing.control_path.clone()
            }
        };

        let root = self.add_wrapper(tree, parent, info);
        let ctx = BuildContext {
            panel: root,
            control_path: base.child(tree.children(parent).len() - 1),
            member_path: enclosing.member_path.clone(),
            owner: info,
        };

        self.visiting.push(info.name);
        let result = self.within_panel(root, |b| b.build_members(tree, &ctx));
        self.visiting.pop();
        result?;

        tracing::debug!(type_name = info.name, member, "built nested widget tree");

        Ok(BuildOutput {
            root,
            records: Vec::new(),
            hidden: Vec::new(),
            templates: TemplateLibrary::default(),
            diagnostics: Vec::new(),
        })
    }

    fn add_wrapper(
        &mut self,
        tree: &mut WidgetTree,
        parent: WidgetId,
        info: &'static TypeInfo,
    ) -> WidgetId {
        let mut wrapper = self.registry().control(ControlType::Panel).named(info.name);
        wrapper.layout = Some(PanelLayout::vertical());
        wrapper.sizing = Sizing::NEUTRAL;
        wrapper.flags.set(WidgetFlags::SUPPRESSED);
        let root = tree.add_child(parent, wrapper);
        self.hidden.push(root);
        root
    }

    fn within_panel<R>(&mut self, panel: WidgetId, f: impl FnOnce(&mut Self) -> R) -> R {
        self.panels.push(panel);
        let result = f(self);
        self.panels.pop();
        result
    }

    fn build_members(&mut self, tree: &mut WidgetTree, ctx: &BuildContext) -> AutoUiResult<()> {
        let resolved = self.resolver.resolve(ctx.owner)?;
        for member in &resolved.members {
            self.build_member(tree, ctx, member)?;
        }
        Ok(())
    }

    fn build_member(
        &mut self,
        tree: &mut WidgetTree,
        ctx: &BuildContext,
        resolved: &ResolvedMember,
    ) -> AutoUiResult<()> {
        let member = resolved.member;
        match &resolved.render {
            RenderKind::Action(marker) => {
                let mut node = self.registry().control(ControlType::Button);
                let caption = marker.caption.as_deref().unwrap_or(member.name);
                node.set_property(WidgetProperty::Caption, Value::from(caption));
                self.place_registered(tree, ctx, node, resolved);
            }
            RenderKind::Collection {
                marker,
                item,
                hierarchical,
                ..
            } => {
                let control = if *hierarchical {
                    ControlType::TreeView
                } else {
                    ControlType::ListView
                };
                let mut node = self.registry().control(control);
                if let Some(caption) = &marker.property.caption {
                    node.set_property(WidgetProperty::Caption, Value::from(caption.as_str()));
                }
                let list = self.place_registered(tree, ctx, node, resolved);
                if *hierarchical {
                    self.compile_template(tree, list, *item)?;
                }
            }
            RenderKind::Property {
                value_type,
                mode: PropertyMode::Editor,
                ..
            } => {
                let node = match self.registry().property_editor(value_type) {
                    Some(node) => node,
                    None => {
                        tracing::warn!(
                            type_name = ctx.owner.name,
                            member = member.name,
                            value_type = value_type.key(),
                            "no property editor registered, using placeholder"
                        );
                        self.diagnostics.push(Diagnostic::MissingCollaborator {
                            member: format!("{}.{}", ctx.owner.name, member.name),
                            what: format!("property editor for {}", value_type.key()),
                        });
                        self.registry().control(ControlType::Placeholder)
                    }
                };
                self.place_registered(tree, ctx, node, resolved);
            }
            RenderKind::Property {
                mode: PropertyMode::Display(shape),
                ..
            } => {
                let node = self.registry().control(shape.control);
                self.place_registered(tree, ctx, node, resolved);
            }
            RenderKind::Procedural { invoke, .. } => {
                let node = self.registry().control(ControlType::Custom);
                let container = self.place_registered(tree, ctx, node, resolved);
                match invoke {
                    ProceduralInvoke::Panel(configure) => configure(tree, container),
                    ProceduralInvoke::Builder(configure) => {
                        let sibling = tree.children(ctx.panel).len() - 1;
                        let enclosing = BuildContext {
                            panel: container,
                            control_path: ctx.control_path.child(sibling),
                            member_path: ctx.member_path.clone(),
                            owner: ctx.owner,
                        };
                        self.procedural.push((enclosing, member.name));
                        self.within_panel(container, |b| configure(b, tree));
                        self.procedural.pop();
                    }
                }
            }
            RenderKind::LayoutGroup { layout, model } => {
                let model = model();
                if self.visiting.contains(&model.name) {
                    return Err(ConfigurationError::RecursiveLayoutGroup {
                        type_name: model.name,
                        member: member.name,
                    }
                    .into());
                }

                let mut node = self.registry().control(ControlType::Panel);
                node.layout = Some(*layout);
                let (panel, sibling) = self.place(tree, ctx, node, resolved);
                let nested = BuildContext {
                    panel,
                    control_path: ctx.control_path.child(sibling),
                    member_path: ctx.member_path.child(member.name),
                    owner: model,
                };

                self.visiting.push(model.name);
                let result = self.within_panel(panel, |b| b.build_members(tree, &nested));
                self.visiting.pop();
                result?;
            }
        }
        Ok(())
    }

    /// Inserts a widget for `resolved` into the context panel.
    fn place(
        &mut self,
        tree: &mut WidgetTree,
        ctx: &BuildContext,
        mut node: WidgetNode,
        resolved: &ResolvedMember,
    ) -> (WidgetId, usize) {
        node.name = resolved.member.name.to_owned();
        node.sizing = resolved.layout.unwrap_or(Sizing::NEUTRAL);
        if let Some(style) = &resolved.style {
            node.style.merge(style);
        }
        node.flags.set(WidgetFlags::SUPPRESSED);

        let sibling = tree.children(ctx.panel).len();
        let id = tree.add_child(ctx.panel, node);
        self.hidden.push(id);
        (id, sibling)
    }

    fn place_registered(
        &mut self,
        tree: &mut WidgetTree,
        ctx: &BuildContext,
        node: WidgetNode,
        resolved: &ResolvedMember,
    ) -> WidgetId {
        let control = node.control;
        let (id, sibling) = self.place(tree, ctx, node, resolved);
        self.records.push(RegistrationRecord {
            control_path: ctx.control_path.child(sibling).skip(CONTROL_PATH_SKIP),
            sibling_index: sibling,
            control,
            member_path: ctx.member_path.clone(),
            owner: ctx.owner,
            member: resolved.member,
            render: resolved.render.clone(),
        });
        id
    }

    /// Compiles the item template of a hierarchical list, once per item type.
    fn compile_template(
        &mut self,
        tree: &mut WidgetTree,
        list: WidgetId,
        item: TypeRef,
    ) -> AutoUiResult<()> {
        let item = item();
        if self.templates.contains(item.name) {
            tracing::trace!(item_type = item.name, "item template already compiled");
            return Ok(());
        }

        let mut holder = WidgetNode::new(ControlType::Panel).named("template");
        holder.flags.set(WidgetFlags::TEMPLATE);
        let holder = tree.add_child(list, holder);

        let mut nested = Builder::new(self.resolver);
        nested.templates = std::mem::take(&mut self.templates);
        nested.templates.begin(item.name);
        let mut output = nested.run(tree, holder, item)?;
        self.templates = std::mem::take(&mut output.templates);
        self.diagnostics.append(&mut output.diagnostics);

        let root = output.root;
        let record_count = output.records.len();
        let bindings = Binder::bind_template(tree, output);
        self.templates.finish(ItemTemplate::new(
            item,
            holder,
            root,
            record_count,
            bindings,
        ));
        tracing::debug!(item_type = item.name, records = record_count, "compiled item template");
        Ok(())
    }
}

impl std::fmt::Debug for Builder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("panel_depth", &self.panels.depth())
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::metadata::{ActionMarker, LayoutGroupMarker, PropertyMarker, ValueType};
    use once_cell::sync::Lazy;

    static SELF_GROUP: Lazy<TypeInfo> = Lazy::new(|| {
        TypeInfo::new("SelfGroup")
            .member(MemberInfo::method("go").with(ActionMarker::new()))
            .member(
                MemberInfo::property("me", ValueType::Model(self_group))
                    .with(LayoutGroupMarker::vertical()),
            )
    });

    fn self_group() -> &'static TypeInfo {
        &SELF_GROUP
    }

    static FORM: Lazy<TypeInfo> = Lazy::new(|| {
        TypeInfo::new("Form")
            .member(MemberInfo::property("name", ValueType::Text).with(PropertyMarker::new()))
            .member(
                MemberInfo::property("pos", ValueType::Other("Vector3"))
                    .with(PropertyMarker::new()),
            )
            .member(
                MemberInfo::method("fill")
                    .configure_builder(fill_extra)
                    .with(crate::metadata::ProceduralMarker::new()),
            )
    });

    fn fill_extra(builder: &mut Builder<'_>, tree: &mut WidgetTree) {
        let panel = builder.current_panel().unwrap();
        assert_eq!(tree.get(panel).unwrap().control, ControlType::Custom);
        builder.add_control(tree, WidgetNode::new(ControlType::Label).named("extra"));
    }

    static OUTER: Lazy<TypeInfo> = Lazy::new(|| {
        TypeInfo::new("Outer")
            .member(MemberInfo::method("first").with(ActionMarker::new()))
            .member(
                MemberInfo::method("custom")
                    .configure_builder(nest_inner)
                    .with(crate::metadata::ProceduralMarker::new()),
            )
            .member(MemberInfo::method("last").with(ActionMarker::new()))
    });

    static INNER: Lazy<TypeInfo> = Lazy::new(|| {
        TypeInfo::new("Inner").member(MemberInfo::method("ok").with(ActionMarker::new()))
    });

    fn nest_inner(builder: &mut Builder<'_>, tree: &mut WidgetTree) {
        let panel = builder.current_panel().unwrap();
        assert_eq!(builder.panel_depth(), 2);
        let output = builder.build(tree, panel, &INNER).unwrap();
        assert_eq!(builder.panel_depth(), 2);
        assert!(output.records.is_empty());
        assert_eq!(tree.parent(output.root), Some(panel));
    }

    fn setup() -> (MetadataResolver, WidgetTree, WidgetId) {
        let resolver = MetadataResolver::new(Arc::new(ControlRegistry::default()));
        let mut tree = WidgetTree::new();
        let parent = tree.add_root(WidgetNode::new(ControlType::Panel));
        (resolver, tree, parent)
    }

    #[test]
    fn test_recursive_layout_group_is_rejected_and_stack_balanced() {
        let (resolver, mut tree, parent) = setup();
        let mut builder = Builder::new(&resolver);
        let err = builder.build(&mut tree, parent, &SELF_GROUP).unwrap_err();
        assert!(matches!(
            err,
            crate::AutoUiError::Configuration(ConfigurationError::RecursiveLayoutGroup { .. })
        ));
        assert_eq!(builder.panel_depth(), 0);
    }

    #[test]
    fn test_placeholder_for_unknown_editor() {
        let (resolver, mut tree, parent) = setup();
        let output = Builder::new(&resolver).build(&mut tree, parent, &FORM).unwrap();

        assert_eq!(output.records.len(), 3);
        assert_eq!(output.records[1].control, ControlType::Placeholder);
        assert_eq!(output.diagnostics.len(), 1);
    }

    #[test]
    fn test_configure_builder_adds_hidden_controls() {
        let (resolver, mut tree, parent) = setup();
        let output = Builder::new(&resolver).build(&mut tree, parent, &FORM).unwrap();

        let custom = tree.resolve_path(output.root, &output.records[2].control_path).unwrap();
        let extra = tree.children(custom)[0];
        assert_eq!(tree.get(extra).unwrap().name, "extra");
        assert!(output.hidden.contains(&extra));
        assert!(!tree.is_visible(extra));
    }

    #[test]
    fn test_wrapper_is_placed_after_existing_children() {
        let (resolver, mut tree, parent) = setup();
        tree.add_child(parent, WidgetNode::new(ControlType::Label));
        let output = Builder::new(&resolver).build(&mut tree, parent, &FORM).unwrap();

        assert_eq!(tree.sibling_index(output.root), Some(1));
        let first = &output.records[0];
        assert_eq!(first.control_path.segments(), &[0]);
        assert_eq!(
            tree.resolve_path(output.root, &first.control_path),
            Some(tree.children(output.root)[0])
        );
    }

    #[test]
    fn test_nested_build_joins_enclosing_pass() {
        let (resolver, mut tree, parent) = setup();
        let mut builder = Builder::new(&resolver);
        let output = builder.build(&mut tree, parent, &OUTER).unwrap();

        let names: Vec<&str> = output.records.iter().map(|r| r.member.name).collect();
        assert_eq!(names, vec!["first", "custom", "ok", "last"]);
        assert_eq!(builder.panel_depth(), 0);

        let ok = &output.records[2];
        assert_eq!(ok.owner.name, "Inner");
        assert!(ok.member_path.is_empty());
        assert_eq!(ok.control_path.segments(), &[1, 0, 0]);
        let button = tree.resolve_path(output.root, &ok.control_path).unwrap();
        assert_eq!(tree.get(button).unwrap().name, "ok");
        assert!(output.hidden.contains(&button));
        assert_eq!(output.hidden.len(), 6);
    }

    #[test]
    fn test_wrapper_sizing_is_reset() {
        let mut registry = ControlRegistry::default();
        registry.register_prefab(
            ControlType::Panel,
            crate::config::PrefabConfig {
                sizing: Some(Sizing {
                    min_height: 30.0,
                    ..Sizing::NEUTRAL
                }),
                ..crate::config::PrefabConfig::default()
            },
        );
        let resolver = MetadataResolver::new(Arc::new(registry));
        let mut tree = WidgetTree::new();
        let parent = tree.add_root(WidgetNode::new(ControlType::Panel));

        let output = Builder::new(&resolver).build(&mut tree, parent, &FORM).unwrap();

        assert!(tree.get(output.root).unwrap().sizing.is_unset());
    }
}
