//! Benchmark for the Build → Instantiate → Bind pipeline.
//!
//! Run with: cargo bench --package autoui --bench build_benchmark

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use once_cell::sync::Lazy;

use autoui::{
    ActionMarker, AutoUi, Binder, LayoutGroupMarker, MemberInfo, PropertyMarker, TypeInfo,
    ValueType, ViewModel, ViewRoot,
};
use autoui_widgets::{ControlType, Value, WidgetNode, WidgetTree};

static SETTINGS: Lazy<TypeInfo> = Lazy::new(|| {
    TypeInfo::new("Settings")
        .member(
            MemberInfo::property("volume", ValueType::Int)
                .with(PropertyMarker::new().caption("Volume")),
        )
        .member(MemberInfo::property("muted", ValueType::Bool).with(PropertyMarker::new()))
        .member(MemberInfo::property("name", ValueType::Text).with(PropertyMarker::new()))
        .member(
            MemberInfo::property("status", ValueType::Text).read_only().with(PropertyMarker::new()),
        )
        .member(MemberInfo::method("apply").with(ActionMarker::new().interactable_unless("muted")))
        .member(
            MemberInfo::property("video", ValueType::Model(video_info))
                .with(LayoutGroupMarker::vertical().spacing(4.0)),
        )
});

static VIDEO: Lazy<TypeInfo> = Lazy::new(|| {
    TypeInfo::new("Video")
        .constructible::<Video>()
        .member(MemberInfo::property("width", ValueType::Int).with(PropertyMarker::new()))
        .member(MemberInfo::property("height", ValueType::Int).with(PropertyMarker::new()))
        .member(MemberInfo::property("vsync", ValueType::Bool).with(PropertyMarker::new()))
});

fn video_info() -> &'static TypeInfo {
    &VIDEO
}

#[derive(Default)]
struct Settings {
    volume: i64,
    video: Option<Box<dyn ViewModel>>,
}

impl ViewModel for Settings {
    fn type_info(&self) -> &'static TypeInfo {
        &SETTINGS
    }

    fn get(&self, member: &str) -> Value {
        match member {
            "volume" => Value::Int(self.volume),
            "muted" => Value::Bool(false),
            "name" | "status" => Value::from("default"),
            _ => Value::Null,
        }
    }

    fn child(&self, member: &str) -> Option<&dyn ViewModel> {
        (member == "video").then_some(())?;
        self.video.as_deref()
    }

    fn child_mut(&mut self, member: &str) -> Option<&mut dyn ViewModel> {
        match (member, &mut self.video) {
            ("video", Some(video)) => Some(&mut **video),
            _ => None,
        }
    }

    fn attach_child(&mut self, member: &str, child: Box<dyn ViewModel>) -> bool {
        if member != "video" {
            return false;
        }
        self.video = Some(child);
        true
    }
}

#[derive(Default)]
struct Video;

impl ViewModel for Video {
    fn type_info(&self) -> &'static TypeInfo {
        &VIDEO
    }

    fn get(&self, member: &str) -> Value {
        match member {
            "width" => Value::Int(1920),
            "height" => Value::Int(1080),
            "vsync" => Value::Bool(true),
            _ => Value::Null,
        }
    }
}

fn benchmark_build(c: &mut Criterion) {
    let ui = AutoUi::default();

    c.bench_function("build_settings", |b| {
        b.iter(|| {
            let mut tree = WidgetTree::new();
            let parent = tree.add_root(WidgetNode::new(ControlType::Panel));
            let output = ui.builder().build(&mut tree, parent, &SETTINGS).unwrap();
            black_box(output.records.len())
        });
    });
}

fn benchmark_build_and_bind(c: &mut Criterion) {
    let ui = AutoUi::default();
    let mut group = c.benchmark_group("build_and_bind");

    for views in [1_u64, 10, 100] {
        group.throughput(Throughput::Elements(views));
        group.bench_with_input(BenchmarkId::from_parameter(views), &views, |b, &views| {
            b.iter(|| {
                let mut tree = WidgetTree::new();
                let parent = tree.add_root(WidgetNode::new(ControlType::Panel));
                for _ in 0..views {
                    let mut model = Settings {
                        video: Some(Box::new(Video)),
                        ..Settings::default()
                    };
                    let output = ui.builder().build(&mut tree, parent, &SETTINGS).unwrap();
                    black_box(Binder::bind(&mut tree, output, &mut model).bindings.len());
                }
            });
        });
    }

    group.finish();
}

fn benchmark_build_view(c: &mut Criterion) {
    let ui = AutoUi::default();

    c.bench_function("build_view_settings", |b| {
        b.iter(|| {
            let mut tree = WidgetTree::new();
            let parent = tree.add_root(WidgetNode::new(ControlType::Panel));
            let root = ViewRoot::new(Box::new(Settings::default()));
            let view = ui.build_view(&mut tree, parent, &root, &[]).unwrap();
            black_box(view.bindings.len())
        });
    });
}

criterion_group!(
    benches,
    benchmark_build,
    benchmark_build_and_bind,
    benchmark_build_view
);
criterion_main!(benches);
