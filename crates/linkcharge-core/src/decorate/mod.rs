//! Live-view decorations.
//!
//! The live view only ever decorates what is on screen. Each qualifying view
//! update rebuilds the whole [`DecorationSet`] from the tokens inside the
//! visible ranges; nothing is patched in place.

mod wikilink;

pub use wikilink::WikilinkTokens;

use crate::attributes::AttributeSet;
use crate::host::MetadataSource;
use crate::resolver::{resolve_attributes, AttributeResolver};
use crate::rules::RuleSet;
use bitflags::bitflags;
use std::collections::{BTreeMap, HashSet};
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, trace};

/// Class of the zero-width glyph widget placed before a decorated link.
pub const LINK_ICON_CLASS: &str = "data-link-icon";

bitflags! {
    /// Syntax roles a token can carry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenRoles: u8 {
        /// Part of an internal link.
        const INTERNAL_LINK = 1 << 0;
        /// Display text after the pipe of an aliased link.
        const ALIAS = 1 << 1;
        /// The pipe separating target and alias.
        const ALIAS_PIPE = 1 << 2;
    }
}

impl TokenRoles {
    /// Roles from a space-separated syntax class list such as
    /// `hmd-internal-link link-alias`. Unknown classes are ignored.
    pub fn from_token_classes(classes: &str) -> Self {
        classes
            .split_ascii_whitespace()
            .fold(TokenRoles::empty(), |roles, class| match class {
                "hmd-internal-link" => roles | TokenRoles::INTERNAL_LINK,
                "link-alias" => roles | TokenRoles::ALIAS,
                "link-alias-pipe" => roles | TokenRoles::ALIAS_PIPE,
                _ => roles,
            })
    }

    /// Link target text, not alias or pipe.
    pub fn is_plain_link(self) -> bool {
        self.contains(TokenRoles::INTERNAL_LINK)
            && !self.intersects(TokenRoles::ALIAS | TokenRoles::ALIAS_PIPE)
    }

    /// Alias display text.
    pub fn is_alias_text(self) -> bool {
        self.contains(TokenRoles::ALIAS) && !self.contains(TokenRoles::ALIAS_PIPE)
    }
}

/// A classified slice of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxToken {
    /// Roles of the token.
    pub roles: TokenRoles,
    /// Byte range in the document.
    pub range: Range<usize>,
}

impl SyntaxToken {
    /// Token with the given roles over `range`.
    pub fn new(roles: TokenRoles, range: Range<usize>) -> Self {
        Self { roles, range }
    }
}

/// Host syntax tree, queried one visible range at a time.
pub trait TokenSource {
    /// Tokens overlapping `range`, in document order.
    fn tokens_in(&self, range: Range<usize>) -> Vec<SyntaxToken>;
}

/// The open document being decorated.
#[derive(Clone, Copy)]
pub struct DocumentContext<'a> {
    /// Vault path of the document, used for relative link resolution.
    pub path: &'a str,
    /// Full document text.
    pub text: &'a str,
    /// Syntax tokens of `text`.
    pub tokens: &'a dyn TokenSource,
}

impl<'a> DocumentContext<'a> {
    /// Context over `text` at `path`.
    pub fn new(path: &'a str, text: &'a str, tokens: &'a dyn TokenSource) -> Self {
        Self { path, text, tokens }
    }
}

/// One decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoration {
    /// Zero-width element inserted at a position.
    Widget {
        /// CSS class of the widget.
        class: String,
        /// `data-link-*` attributes.
        attributes: BTreeMap<String, String>,
    },
    /// Attributes laid over a span of text.
    Mark {
        /// `data-link-*` attributes.
        attributes: BTreeMap<String, String>,
    },
}

impl Decoration {
    /// Attributes carried by the decoration.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        match self {
            Decoration::Widget { attributes, .. } | Decoration::Mark { attributes } => attributes,
        }
    }

    fn is_widget(&self) -> bool {
        matches!(self, Decoration::Widget { .. })
    }
}

/// A decoration over a document range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationRange {
    /// Covered range; empty for widgets.
    pub range: Range<usize>,
    /// The decoration.
    pub decoration: Decoration,
}

/// Decorations ordered by start offset, widgets before marks at the same
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationSet {
    ranges: Vec<DecorationRange>,
}

impl DecorationSet {
    /// Build a set from unordered ranges.
    pub fn from_ranges(mut ranges: Vec<DecorationRange>) -> Self {
        ranges.sort_by_key(|r| (r.range.start, !r.decoration.is_widget(), r.range.end));
        Self { ranges }
    }

    /// Decorations in order.
    pub fn iter(&self) -> impl Iterator<Item = &DecorationRange> {
        self.ranges.iter()
    }

    /// Number of decorations.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether there are no decorations.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Mark decorations only.
    pub fn marks(&self) -> impl Iterator<Item = &DecorationRange> {
        self.ranges.iter().filter(|r| !r.decoration.is_widget())
    }

    /// Widget decorations only.
    pub fn widgets(&self) -> impl Iterator<Item = &DecorationRange> {
        self.ranges.iter().filter(|r| r.decoration.is_widget())
    }
}

/// Builds decoration sets for the visible part of a document.
#[derive(Debug, Clone)]
pub struct LiveViewDecorator {
    enabled: bool,
    rules: Arc<RuleSet>,
}

impl LiveViewDecorator {
    /// Decorator over `rules`; a disabled decorator always yields nothing.
    pub fn new(enabled: bool, rules: Arc<RuleSet>) -> Self {
        Self { enabled, rules }
    }

    /// Whether decorations are produced.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Rebuild decorations for `visible_ranges` of `doc`.
    ///
    /// Each resolved plain link gets a widget at its start and a mark over
    /// its text, even when its target yields no attributes.
    /// An alias directly following a link reuses that link's attributes
    /// without resolving the alias text. Tokens seen through overlapping
    /// ranges are decorated once.
    pub fn build<M: MetadataSource + ?Sized>(
        &self,
        visible_ranges: &[Range<usize>],
        doc: &DocumentContext<'_>,
        source: &M,
    ) -> DecorationSet {
        if !self.enabled {
            return DecorationSet::default();
        }

        let resolver = AttributeResolver::new(source, &self.rules);
        let mut ranges: Vec<Range<usize>> = visible_ranges.to_vec();
        ranges.sort_by_key(|r| (r.start, r.end));

        let mut seen = HashSet::new();
        let mut carry: Option<AttributeSet> = None;
        let mut decorations = Vec::new();

        for visible in ranges {
            for token in doc.tokens.tokens_in(visible) {
                if !seen.insert((token.range.start, token.range.end)) {
                    continue;
                }

                if token.roles.is_plain_link() {
                    let Some(text) = doc.text.get(token.range.clone()) else {
                        carry = None;
                        continue;
                    };
                    let Some(target) = resolver.resolve_target(text, doc.path) else {
                        trace!("Unresolved link {:?}", text);
                        carry = None;
                        continue;
                    };
                    let attributes = resolve_attributes(Some(&target), source, &self.rules);
                    let dom = attributes.to_dom();
                    decorations.push(DecorationRange {
                        range: token.range.start..token.range.start,
                        decoration: Decoration::Widget {
                            class: LINK_ICON_CLASS.to_string(),
                            attributes: dom.clone(),
                        },
                    });
                    decorations.push(DecorationRange {
                        range: token.range.clone(),
                        decoration: Decoration::Mark { attributes: dom },
                    });
                    carry = Some(attributes);
                } else if token.roles.is_alias_text() {
                    if let Some(attributes) = &carry {
                        decorations.push(DecorationRange {
                            range: token.range.clone(),
                            decoration: Decoration::Mark {
                                attributes: attributes.to_dom(),
                            },
                        });
                    }
                }
            }
        }

        debug!("Built {} decorations for {}", decorations.len(), doc.path);
        DecorationSet::from_ranges(decorations)
    }
}

/// What changed in the view since the last update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewUpdate {
    /// The document text changed.
    pub doc_changed: bool,
    /// The visible ranges changed.
    pub viewport_changed: bool,
}

impl ViewUpdate {
    /// A document edit.
    pub const DOC: Self = Self {
        doc_changed: true,
        viewport_changed: false,
    };

    /// A scroll or resize.
    pub const VIEWPORT: Self = Self {
        doc_changed: false,
        viewport_changed: true,
    };

    /// Whether the update calls for a rebuild.
    pub fn requires_rebuild(&self) -> bool {
        self.doc_changed || self.viewport_changed
    }
}

/// Lifecycle state of a [`LiveView`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewState {
    /// Decorations are current.
    #[default]
    Idle,
    /// A rebuild is in progress.
    Rebuilding,
}

/// Decoration state of one open document.
#[derive(Debug, Clone, Default)]
pub struct LiveView {
    state: ViewState,
    decorations: DecorationSet,
    generation: u64,
}

impl LiveView {
    /// View with its first decoration set already built.
    pub fn open<M: MetadataSource + ?Sized>(
        decorator: &LiveViewDecorator,
        visible_ranges: &[Range<usize>],
        doc: &DocumentContext<'_>,
        source: &M,
    ) -> Self {
        let mut view = Self::default();
        view.rebuild(decorator, visible_ranges, doc, source);
        view
    }

    /// Apply a view update. Returns whether the decorations were rebuilt.
    pub fn update<M: MetadataSource + ?Sized>(
        &mut self,
        update: ViewUpdate,
        decorator: &LiveViewDecorator,
        visible_ranges: &[Range<usize>],
        doc: &DocumentContext<'_>,
        source: &M,
    ) -> bool {
        if !update.requires_rebuild() {
            return false;
        }
        self.rebuild(decorator, visible_ranges, doc, source);
        true
    }

    fn rebuild<M: MetadataSource + ?Sized>(
        &mut self,
        decorator: &LiveViewDecorator,
        visible_ranges: &[Range<usize>],
        doc: &DocumentContext<'_>,
        source: &M,
    ) {
        self.state = ViewState::Rebuilding;
        self.decorations = decorator.build(visible_ranges, doc, source);
        self.generation += 1;
        self.state = ViewState::Idle;
    }

    /// Current state.
    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Current decorations.
    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    /// Number of rebuilds so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
