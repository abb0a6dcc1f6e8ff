//! # linkcharge core
//!
//! Attribute propagation engine: links inside a knowledge-base editor get
//! `data-link-*` attributes derived from the front-matter of the documents
//! they point to, and those attributes are kept current across three surfaces
//! that change independently.
//!
//! ```text
//! metadata changed ──▶ LinkCoordinator ──(debounced)──▶ PanelSynchronizer ──▶ applicator
//!                              │                               │
//! layout changed ──────────────┘                               ▼
//!                                                      AttributeResolver
//! edit / scroll ─────▶ LiveViewDecorator ──────────────────────▲
//! ```
//!
//! Everything here is single-threaded and synchronous. The host owns the
//! DOM, the syntax tree and the metadata index, and hands them in through the
//! traits in [`host`] and [`dom`].

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod applicator;
pub mod attributes;
pub mod coordinator;
pub mod debounce;
pub mod decorate;
pub mod dom;
pub mod error;
pub mod field;
pub mod host;
pub mod link;
pub mod resolver;
pub mod rules;
pub mod sync;
pub mod test_support;

pub use attributes::{AttributeSet, DATA_LINK_PREFIX};
pub use coordinator::{
    LinkCoordinator, ObserverRegistration, ObserverRegistry, RefreshReport, RegistrationReport,
    TeardownReport,
};
pub use debounce::{Clock, Debouncer, ManualClock, SystemClock};
pub use decorate::{
    Decoration, DecorationRange, DecorationSet, DocumentContext, LiveView, LiveViewDecorator,
    SyntaxToken, TokenRoles, TokenSource, ViewState, ViewUpdate, WikilinkTokens, LINK_ICON_CLASS,
};
pub use dom::{
    DomTree, MemoryDom, MutationHost, MutationKind, MutationRecord, NodeId, ObserveOptions,
    ObserverId, Selector,
};
pub use error::{Error, Result};
pub use field::Field;
pub use host::{Host, LinkTarget, Metadata, MetadataBatch, MetadataSource, PanelRegistry};
pub use resolver::{resolve_attributes, AttributeResolver};
pub use rules::{AttributeRule, RuleSet};
pub use sync::{PanelSynchronizer, SyncStats};

pub use linkcharge_config::{Diagnostic, DiagnosticKind, Settings, SyncMode};
