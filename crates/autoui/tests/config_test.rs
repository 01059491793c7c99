//! Integration tests for TOML registry configuration.

use autoui::{
    ActionMarker, AutoUi, AutoUiError, ConfigError, MemberInfo, PropertyMarker, TypeInfo,
    UiConfig, ValueType,
};
use autoui_widgets::{ControlType, WidgetNode, WidgetTree};
use once_cell::sync::Lazy;

const CONFIG: &str = r#"
[controls.button]
caption = "Press"
style_class = "primary"

[controls.button.sizing]
min_height = 24.0

[editors]
int = "float_field"
"Vector3" = "text_field"

[[shapes]]
value_type = "image"
control = "image"
slot = "sprite"
"#;

static PROBE: Lazy<TypeInfo> = Lazy::new(|| {
    TypeInfo::new("Probe")
        .member(MemberInfo::method("ping").with(ActionMarker::new()))
        .member(MemberInfo::property("level", ValueType::Int).with(PropertyMarker::new()))
        .member(
            MemberInfo::property("position", ValueType::Other("Vector3"))
                .with(PropertyMarker::new()),
        )
        .member(MemberInfo::property("flag", ValueType::Bool).with(PropertyMarker::new()))
        .member(
            MemberInfo::property("icon", ValueType::Image).read_only().with(PropertyMarker::new()),
        )
        .member(
            MemberInfo::property("status", ValueType::Text).read_only().with(PropertyMarker::new()),
        )
});

fn temp_config_path(tag: &str) -> std::path::PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("autoui_{tag}_{id}.toml"))
}

#[test]
fn test_config_drives_registry() {
    let config = UiConfig::from_toml_str(CONFIG).unwrap();
    let ui = AutoUi::from_config(&config);
    let mut tree = WidgetTree::new();
    let parent = tree.add_root(WidgetNode::new(ControlType::Panel));

    let output = ui.builder().build(&mut tree, parent, &PROBE).unwrap();

    let controls: Vec<ControlType> = output.records.iter().map(|r| r.control).collect();
    assert_eq!(
        controls,
        vec![
            ControlType::Button,
            ControlType::FloatField,
            ControlType::TextField,
            ControlType::Placeholder,
            ControlType::Image,
        ]
    );
    assert_eq!(output.diagnostics.len(), 1);

    let ping = tree.resolve_path(output.root, &output.records[0].control_path).unwrap();
    let ping = tree.get(ping).unwrap();
    assert_eq!(ping.caption(), Some("ping"));
    assert_eq!(ping.style.class.as_deref(), Some("primary"));
    assert!(ping.sizing.is_unset());
}

#[test]
fn test_load_from_file() {
    let path = temp_config_path("load");
    std::fs::write(&path, CONFIG).unwrap();

    let ui = AutoUi::load(&path).unwrap();
    assert!(ui.registry().display_shape(&ValueType::Text).is_none());
    assert!(ui.registry().display_shape(&ValueType::Image).is_some());

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_errors() {
    let missing = temp_config_path("missing");
    assert!(matches!(
        AutoUi::load(&missing),
        Err(AutoUiError::Config(ConfigError::Io { .. }))
    ));

    let path = temp_config_path("invalid");
    std::fs::write(&path, "[editors]\nint = \"slider\"\n").unwrap();
    assert!(matches!(
        AutoUi::load(&path),
        Err(AutoUiError::Config(ConfigError::Parse(_)))
    ));
    std::fs::remove_file(&path).ok();
}
