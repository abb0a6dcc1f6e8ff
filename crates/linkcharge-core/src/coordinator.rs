//! Lifecycle of panel observers and debounced refreshes.
//!
//! The [`LinkCoordinator`] is the single owner of every observer the engine
//! registers. Hosts feed it three kinds of events:
//!
//! - layout changed: observers are torn down and re-registered for whatever
//!   panels are open now
//! - metadata changed: a refresh of every registered panel is scheduled
//!   behind a quiet window
//! - mutation batches: routed to the synchronizer of the observer that
//!   produced them

use crate::debounce::{Clock, Debouncer, SystemClock};
use crate::decorate::{DecorationSet, DocumentContext, LiveViewDecorator};
use crate::dom::{
    DomTree, MutationHost, MutationRecord, NodeId, ObserveOptions, ObserverId, Selector,
};
use crate::host::{Host, MetadataBatch, MetadataSource};
use crate::resolver::AttributeResolver;
use crate::rules::RuleSet;
use crate::sync::{self, PanelSynchronizer, SyncStats};
use linkcharge_config::{Diagnostic, DiagnosticKind, Settings, SyncMode};
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// A wired panel instance.
#[derive(Debug, Clone)]
pub struct ObserverRegistration {
    observer: ObserverId,
    synchronizer: PanelSynchronizer,
}

impl ObserverRegistration {
    /// Observer handle.
    pub fn observer(&self) -> ObserverId {
        self.observer
    }

    /// Panel type identifier.
    pub fn panel_type(&self) -> &str {
        self.synchronizer.panel_type()
    }

    /// Selector of the panel's link elements.
    pub fn selector(&self) -> &Selector {
        self.synchronizer.selector()
    }

    /// Root element of the panel.
    pub fn container(&self) -> NodeId {
        self.synchronizer.container()
    }

    /// Synchronizer driving the panel.
    pub fn synchronizer(&self) -> &PanelSynchronizer {
        &self.synchronizer
    }
}

/// Active registrations, at most one per panel type.
#[derive(Debug, Clone, Default)]
pub struct ObserverRegistry {
    entries: BTreeMap<String, ObserverRegistration>,
}

impl ObserverRegistry {
    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registration for a panel type.
    pub fn get(&self, panel_type: &str) -> Option<&ObserverRegistration> {
        self.entries.get(panel_type)
    }

    /// Registrations ordered by panel type.
    pub fn iter(&self) -> impl Iterator<Item = &ObserverRegistration> {
        self.entries.values()
    }

    /// Registration owning `observer`.
    pub fn find_by_observer(&self, observer: ObserverId) -> Option<&ObserverRegistration> {
        self.entries.values().find(|r| r.observer == observer)
    }

    fn insert(&mut self, registration: ObserverRegistration) -> Option<ObserverRegistration> {
        self.entries
            .insert(registration.panel_type().to_string(), registration)
    }

    fn take_all(&mut self) -> Vec<ObserverRegistration> {
        std::mem::take(&mut self.entries).into_values().collect()
    }
}

/// Outcome of a layout change.
#[derive(Debug, Clone, Default)]
pub struct RegistrationReport {
    /// Panel types now observed.
    pub registered: Vec<String>,
    /// Observers disconnected before re-registering.
    pub disconnected: usize,
    /// Initial synchronization of the newly wired panels.
    pub synced: SyncStats,
    /// Problems found while wiring panels.
    pub diagnostics: Vec<Diagnostic>,
}

/// Outcome of a debounced refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Metadata-changed events collapsed into this refresh.
    pub coalesced: usize,
    /// Panels refreshed.
    pub panels: usize,
    /// Link elements visited and changed.
    pub stats: SyncStats,
}

/// Outcome of a teardown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeardownReport {
    /// Observers disconnected.
    pub disconnected: usize,
    /// Elements that lost `data-link-*` attributes.
    pub cleared: usize,
}

#[derive(Debug, Clone)]
struct CompiledBinding {
    panel_type: String,
    selector: Selector,
    mode: SyncMode,
}

/// Owns registrations, the debounced refresh and the live-view decorator.
#[derive(Debug)]
pub struct LinkCoordinator<C: Clock = SystemClock> {
    settings: Settings,
    rules: Arc<RuleSet>,
    bindings: Vec<CompiledBinding>,
    decorator: LiveViewDecorator,
    registry: ObserverRegistry,
    debouncer: Debouncer,
    clock: C,
    diagnostics: Vec<Diagnostic>,
}

impl LinkCoordinator<SystemClock> {
    /// Coordinator on the wall clock.
    pub fn new(settings: Settings) -> Self {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> LinkCoordinator<C> {
    /// Coordinator on an explicit clock.
    ///
    /// Rules and panel selectors are compiled here. Anything malformed is
    /// skipped and reported through [`LinkCoordinator::diagnostics`].
    pub fn with_clock(settings: Settings, clock: C) -> Self {
        let (rules, mut diagnostics) = RuleSet::compile(&settings);
        diagnostics.extend(
            settings
                .validate()
                .into_iter()
                .filter(|d| d.kind == DiagnosticKind::DuplicatePanelBinding),
        );

        let mut bindings = Vec::new();
        for binding in settings.panel_bindings() {
            match Selector::parse(&binding.selector) {
                Ok(selector) => bindings.push(CompiledBinding {
                    panel_type: binding.panel_type.clone(),
                    selector,
                    mode: binding.mode,
                }),
                Err(e) => {
                    warn!("Skipping {} panel binding: {}", binding.panel_type, e);
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::MalformedSelector,
                        &binding.panel_type,
                        e.to_string(),
                    ));
                }
            }
        }

        let rules = Arc::new(rules);
        let decorator = LiveViewDecorator::new(settings.enable_editor, Arc::clone(&rules));
        let debouncer = Debouncer::new(settings.quiet_window());

        info!(
            "Link coordinator ready: {} rules, {} panel bindings, {} diagnostics",
            rules.rules().len(),
            bindings.len(),
            diagnostics.len()
        );

        Self {
            settings,
            rules,
            bindings,
            decorator,
            registry: ObserverRegistry::default(),
            debouncer,
            clock,
            diagnostics,
        }
    }

    /// Settings snapshot in use.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Compiled rules.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Configuration problems found at construction.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Active registrations.
    pub fn registry(&self) -> &ObserverRegistry {
        &self.registry
    }

    /// Live-view decorator.
    pub fn decorator(&self) -> &LiveViewDecorator {
        &self.decorator
    }

    /// Re-register observers for the panels open now.
    ///
    /// Every existing observer is disconnected first. Each bound panel type
    /// with an open instance is synchronized once and then observed for
    /// structural changes. Panel types with no open instance are skipped;
    /// with several instances only the first is wired.
    pub fn on_layout_changed<H, M>(&mut self, host: &mut H, source: &M) -> RegistrationReport
    where
        H: Host + ?Sized,
        M: MetadataSource + ?Sized,
    {
        let mut report = RegistrationReport {
            disconnected: self.disconnect_all(host),
            ..RegistrationReport::default()
        };
        if !self.settings.enable_panels {
            debug!("Panel synchronization disabled");
            return report;
        }

        let resolver = AttributeResolver::new(source, &self.rules);
        for binding in &self.bindings {
            let panels = host.open_panels(&binding.panel_type);
            let Some(&container) = panels.first() else {
                trace!("No open {} panel", binding.panel_type);
                continue;
            };
            if panels.len() > 1 {
                warn!(
                    "{} open {} panels, only the first is synchronized",
                    panels.len(),
                    binding.panel_type
                );
                report.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MultiplePanelInstances,
                    &binding.panel_type,
                    format!("{} instances open, only the first is synchronized", panels.len()),
                ));
            }

            let synchronizer = PanelSynchronizer::new(
                binding.panel_type.clone(),
                container,
                binding.selector.clone(),
                binding.mode,
            );
            report.synced = report.synced.merge(synchronizer.sync_all(host, &resolver));

            let observer = host.observe(container, ObserveOptions::STRUCTURAL);
            debug!("Observing {} panel as {:?}", binding.panel_type, observer);
            report.registered.push(binding.panel_type.clone());
            self.registry.insert(ObserverRegistration {
                observer,
                synchronizer,
            });
        }

        info!(
            "Registered {} panel observers ({} replaced)",
            report.registered.len(),
            report.disconnected
        );
        report
    }

    /// Schedule a refresh after the quiet window.
    pub fn on_metadata_changed(&mut self, batch: &MetadataBatch) {
        if !self.settings.enable_panels {
            return;
        }
        trace!("Metadata changed for {} notes", batch.paths.len());
        self.debouncer.trigger(self.clock.now());
    }

    /// When the pending refresh is due, if one is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Run the pending refresh if its quiet window has elapsed.
    pub fn poll<D, M>(&mut self, dom: &mut D, source: &M) -> Option<RefreshReport>
    where
        D: DomTree + ?Sized,
        M: MetadataSource + ?Sized,
    {
        let coalesced = self.debouncer.poll(self.clock.now())?;
        let stats = self.refresh_panels(dom, source);
        let report = RefreshReport {
            coalesced,
            panels: self.registry.len(),
            stats,
        };
        info!(
            "Refreshed {} panels after {} metadata changes ({} links changed)",
            report.panels, report.coalesced, report.stats.changed
        );
        Some(report)
    }

    /// Re-apply attributes across every registered panel now.
    pub fn refresh_panels<D, M>(&self, dom: &mut D, source: &M) -> SyncStats
    where
        D: DomTree + ?Sized,
        M: MetadataSource + ?Sized,
    {
        let resolver = AttributeResolver::new(source, &self.rules);
        self.registry
            .iter()
            .fold(SyncStats::default(), |stats, registration| {
                stats.merge(registration.synchronizer.sync_all(dom, &resolver))
            })
    }

    /// Route a mutation batch to the synchronizer that owns `observer`.
    pub fn on_mutations<D, M>(
        &self,
        observer: ObserverId,
        records: &[MutationRecord],
        dom: &mut D,
        source: &M,
    ) -> SyncStats
    where
        D: DomTree + ?Sized,
        M: MetadataSource + ?Sized,
    {
        let Some(registration) = self.registry.find_by_observer(observer) else {
            trace!("Ignoring batch for unknown observer {:?}", observer);
            return SyncStats::default();
        };
        let resolver = AttributeResolver::new(source, &self.rules);
        registration
            .synchronizer
            .handle_mutations(records, dom, &resolver)
    }

    /// Decorations for the visible ranges of an open document.
    pub fn build_decorations_for_viewport<M>(
        &self,
        visible_ranges: &[Range<usize>],
        doc: &DocumentContext<'_>,
        source: &M,
    ) -> DecorationSet
    where
        M: MetadataSource + ?Sized,
    {
        self.decorator.build(visible_ranges, doc, source)
    }

    /// Disconnect every observer and strip applied attributes from every
    /// open panel of a registered type. A pending refresh is dropped.
    pub fn teardown<H: Host + ?Sized>(&mut self, host: &mut H) -> TeardownReport {
        self.debouncer.cancel();
        let registrations = self.registry.take_all();
        let mut report = TeardownReport::default();

        for registration in &registrations {
            host.disconnect(registration.observer);
            report.disconnected += 1;
            for container in host.open_panels(registration.panel_type()) {
                report.cleared += sync::clear_container(host, container, registration.selector());
            }
        }

        info!(
            "Teardown: {} observers disconnected, {} elements cleared",
            report.disconnected, report.cleared
        );
        report
    }

    fn disconnect_all<H: MutationHost + ?Sized>(&mut self, host: &mut H) -> usize {
        let registrations = self.registry.take_all();
        for registration in &registrations {
            host.disconnect(registration.observer);
        }
        registrations.len()
    }
}
