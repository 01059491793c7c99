//! View-model metadata.
//!
//! Types describe themselves with static [`TypeInfo`] tables; members carry
//! [`Marker`]s that the [`MetadataResolver`] turns into render kinds.

pub mod markers;
pub mod resolver;
pub mod types;

pub use markers::{
    ActionMarker, ChangeHandlerMarker, ChangeKind, CollectionMarker, Companion, DialogMarker,
    DialogRole, LayoutGroupMarker, LayoutMarker, Marker, Orientation, ProceduralMarker,
    PropertyMarker, StyleMarker,
};
pub use resolver::{
    MetadataResolver, ProceduralInvoke, PropertyMode, RenderKind, ResolvedMember, ResolvedType,
};
pub use types::{
    Constructor, ConfigureBuilderFn, ConfigurePanelFn, MemberInfo, MemberKind, MethodSignature,
    ServiceType, TypeInfo, TypeRef, ValueType,
};
