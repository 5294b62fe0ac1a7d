//! API-facing memo representation and store→API conversion.
//!
//! # Responsibility
//! - Define the externally visible memo message and its satellite shapes.
//! - Convert storage records into API messages, with view-dependent
//!   enrichment behind the [`AssemblyContext`] collaborator seam.
//!
//! # Invariants
//! - API messages are derived projections; they are never persisted.
//! - External identity is always `"<prefix><numeric-id>"`; the numeric id
//!   itself never leaves the storage boundary.

pub mod convert;
pub mod message;

pub use convert::{
    convert_memo_from_store, convert_relation_from_store, location_from_store, location_to_store,
    property_from_store, property_to_store, relation_type_from_store, relation_type_to_store,
    state_from_store, state_to_store, visibility_from_store, visibility_to_store, AssemblyContext,
    ConvertError, MemoRelatedSetting,
};
pub use message::{
    format_memo_name, format_user_name, parse_memo_name, ApiLocation, ApiMemo, ApiMemoProperty,
    ApiMemoRelation, ApiReaction, ApiRelationType, ApiResource, ApiState, ApiVisibility, MemoView,
    MEMO_NAME_PREFIX, USER_NAME_PREFIX,
};
