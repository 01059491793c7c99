//! # AutoUI
//!
//! Declarative view-model-to-widget compiler and binder:
//! - Static metadata tables describe each view-model type
//! - The builder synthesizes widgets from the type alone
//! - The instantiator fills nested sub-objects and injects dependencies
//! - The binder wires the widgets to the live instance
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       AUTOUI PIPELINE                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  TypeInfo → Resolver → Builder → Instantiator → Binder → View │
//! │                 ↓          ↓           ↓            ↓         │
//! │            RenderKind   Records   Subscriptions  BindingSet   │
//! │                            ↓                                  │
//! │                   ItemTemplate (Builder + Binder, once)       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! let ui = AutoUi::new(ControlRegistry::default());
//! let root = ViewRoot::new(Box::new(Settings::default()));
//! let view = ui.build_view(&mut tree, parent, &root, &[])?;
//! view.dispatch(&mut tree, save_button, &root)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod binder;
pub mod binding;
pub mod builder;
pub mod config;
pub mod dependency;
pub mod dialog;
pub mod error;
pub mod instantiate;
pub mod metadata;
pub mod model;
pub mod registry;
pub mod template;
pub mod view;

use std::path::Path;
use std::sync::Arc;

use autoui_widgets::{WidgetId, WidgetTree};

pub use binder::{BindReport, Binder, BoundView};
pub use binding::{Binding, BindingKey, BindingKind, BindingSet, BindingTarget, TemplateScope};
pub use builder::{BuildOutput, Builder, LayoutPanelStack, RegistrationRecord, CONTROL_PATH_SKIP};
pub use config::{PrefabConfig, ShapeConfig, UiConfig};
pub use dependency::{Change, ChangeNotifier, Dependency, Observable, SubscriptionId, Subscriptions};
pub use dialog::{
    DefaultWindowManager, Dialog, DialogAssembler, DialogCallback, DialogCallbacks, DialogRequest,
    DialogShell, WindowManager,
};
pub use error::{AutoUiError, AutoUiResult, ConfigError, ConfigurationError, Diagnostic};
pub use instantiate::{InstantiateReport, Instantiation, Instantiator};
pub use metadata::{
    ActionMarker, ChangeHandlerMarker, ChangeKind, CollectionMarker, Companion, DialogMarker,
    DialogRole, LayoutGroupMarker, LayoutMarker, Marker, MemberInfo, MemberKind, MetadataResolver,
    MethodSignature, Orientation, ProceduralMarker, PropertyMarker, RenderKind, ServiceType,
    StyleMarker, TypeInfo, TypeRef, ValueType,
};
pub use model::{ItemSource, MemberPath, PendingCall, RowPath, ViewModel, ViewRoot};
pub use registry::{ControlRegistry, DisplayShape};
pub use template::{ItemTemplate, RealizedRow, TemplateLibrary};
pub use view::View;

/// Entry point owning the registries and the metadata resolver.
#[derive(Debug)]
pub struct AutoUi {
    resolver: MetadataResolver,
}

impl AutoUi {
    /// Creates an instance over `registry`.
    #[must_use]
    pub fn new(registry: ControlRegistry) -> Self {
        Self {
            resolver: MetadataResolver::new(Arc::new(registry)),
        }
    }

    /// Creates an instance from configuration.
    #[must_use]
    pub fn from_config(config: &UiConfig) -> Self {
        Self::new(ControlRegistry::from_config(config))
    }

    /// Creates an instance from a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`AutoUiError::Config`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> AutoUiResult<Self> {
        Ok(Self::from_config(&UiConfig::load(path)?))
    }

    /// The metadata resolver.
    #[must_use]
    pub fn resolver(&self) -> &MetadataResolver {
        &self.resolver
    }

    /// The control registry.
    #[must_use]
    pub fn registry(&self) -> &ControlRegistry {
        self.resolver.registry()
    }

    /// A fresh builder.
    #[must_use]
    pub fn builder(&self) -> Builder<'_> {
        Builder::new(&self.resolver)
    }

    /// Builds, instantiates and binds `root` under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`AutoUiError::Configuration`] if the root type or a nested
    /// type carries invalid metadata. Nothing is instantiated in that case.
    pub fn build_view(
        &self,
        tree: &mut WidgetTree,
        parent: WidgetId,
        root: &Arc<ViewRoot>,
        dependencies: &[Dependency],
    ) -> AutoUiResult<View> {
        let output = self.builder().build(tree, parent, root.type_info())?;
        let instantiation = Instantiator::new(dependencies).instantiate(root);
        let bound = root.with(|model| Binder::bind(tree, output, model));
        Ok(View::assemble(bound, instantiation))
    }

    /// Opens a modal dialog for `root`.
    ///
    /// # Errors
    ///
    /// See [`AutoUi::build_view`].
    pub fn open_dialog(
        &self,
        tree: &mut WidgetTree,
        windows: &mut dyn WindowManager,
        root: &Arc<ViewRoot>,
        dependencies: &[Dependency],
    ) -> AutoUiResult<Dialog> {
        let info = root.type_info();
        let callbacks = DialogAssembler::scan(info);
        let request = DialogRequest {
            title: info.name.to_owned(),
            buttons: callbacks
                .roles()
                .into_iter()
                .map(|role| (role, callbacks.caption(role)))
                .collect(),
        };

        let shell = windows.create_dialog_window(tree, &request);
        tracing::info!(
            title = %request.title,
            buttons = request.buttons.len(),
            callbacks = callbacks.len(),
            "opened dialog"
        );
        let view = self.build_view(tree, shell.content, root, dependencies)?;
        Ok(Dialog {
            shell,
            view,
            callbacks,
        })
    }
}

impl Default for AutoUi {
    fn default() -> Self {
        Self::new(ControlRegistry::default())
    }
}
