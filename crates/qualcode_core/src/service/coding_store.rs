//! Coding store: the mutation API and read façade.
//!
//! # Responsibility
//! - Validate mutation inputs at the API boundary.
//! - Coordinate registries, the assignment table and the audit log.
//! - Propagate derived analytics and notify observers before returning.
//!
//! # Invariants
//! - Every code id held by the assignment table, the audit log, a relation,
//!   a memo or a temporal code names a registered code.
//! - Empty row lists are successful no-ops and leave no audit entry.
//! - Only code-level mutations (create/apply/remove/merge/split) enter the
//!   audit log; other registries log through `log` only.
//! - Observers run after derived values are current.

use crate::analytics::{
    AssignmentsByRow, Cooccurrence, Derived, DerivedGraph, GraphInputs, Saturation,
    SaturationSettings, Source,
};
use crate::assignments::AssignmentTable;
use crate::audit::AuditLog;
use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, StoreConfig};
use crate::export::{self, ExportError, ProjectSnapshot};
use crate::ids::IdGenerator;
use crate::model::{
    Actor, ActorId, ActorLink, Code, CodeId, CodeRelation, CodingAction, CodingEvent, Memo,
    NewActor, NewActorLink, NewCode, NewMemo, NewRelation, NewTemporalCode, RowId, TemporalCode,
};
use crate::observe::{Change, ObserverId, Observers, Topic};
use crate::registry::Registry;
use crate::validate::{normalize_color, normalize_name, normalize_tags};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Name given to codes created without one.
pub const DEFAULT_CODE_NAME: &str = "New Code";
/// Name given to actors created without one.
pub const DEFAULT_ACTOR_NAME: &str = "New Actor";

const CODE_ID_PREFIX: &str = "code";
const MEMO_ID_PREFIX: &str = "memo";
const RELATION_ID_PREFIX: &str = "rel";
const ACTOR_ID_PREFIX: &str = "actor";
const ACTOR_LINK_ID_PREFIX: &str = "link";
const TEMPORAL_CODE_ID_PREFIX: &str = "tcode";

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from coding store mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Referenced code is not registered.
    CodeNotFound(CodeId),
    /// Referenced actor is not registered.
    ActorNotFound(ActorId),
    /// Input failed boundary validation.
    InvalidInput(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CodeNotFound(id) => write!(f, "code not found: {id}"),
            Self::ActorNotFound(id) => write!(f, "actor not found: {id}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
        }
    }
}

impl Error for StoreError {}

/// In-memory coding session.
///
/// Construct one per session and pass it by reference; mutating methods take
/// `&mut self`, so the borrow checker enforces the single writer.
#[derive(Debug)]
pub struct CodingStore<C: Clock = SystemClock> {
    config: StoreConfig,
    clock: C,
    ids: IdGenerator,
    coder: Option<String>,
    codes: Registry<Code>,
    memos: Registry<Memo>,
    relations: Registry<CodeRelation>,
    actors: Registry<Actor>,
    actor_links: Registry<ActorLink>,
    temporal_codes: Registry<TemporalCode>,
    assignments: AssignmentTable,
    audit: AuditLog,
    derived: DerivedGraph,
    observers: Observers,
}

impl CodingStore<SystemClock> {
    /// Creates an empty store using the wall clock.
    pub fn new(config: StoreConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for CodingStore<SystemClock> {
    fn default() -> Self {
        Self::build(StoreConfig::default(), SystemClock)
    }
}

impl<C: Clock> CodingStore<C> {
    /// Creates an empty store with a caller-provided clock.
    pub fn with_clock(config: StoreConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, clock))
    }

    fn build(config: StoreConfig, clock: C) -> Self {
        let codes = Registry::new();
        let assignments = AssignmentTable::new();
        let audit = AuditLog::new();
        let settings = SaturationSettings {
            window: config.saturation_window,
            threshold: config.saturation_threshold,
        };
        let derived = DerivedGraph::new(
            settings,
            GraphInputs {
                codes: codes.as_slice(),
                assignments: &assignments,
                events: &audit,
            },
        );
        info!(
            "event=store_init module=store status=ok id_source={:?} saturation_window={} saturation_threshold={}",
            config.id_source, config.saturation_window, config.saturation_threshold
        );

        Self {
            ids: IdGenerator::new(config.id_source),
            config,
            clock,
            coder: None,
            codes,
            memos: Registry::new(),
            relations: Registry::new(),
            actors: Registry::new(),
            actor_links: Registry::new(),
            temporal_codes: Registry::new(),
            assignments,
            audit,
            derived,
            observers: Observers::new(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Sets the coder recorded on subsequent audit events.
    pub fn set_coder(&mut self, coder: Option<String>) {
        self.coder = coder.and_then(|value| normalize_name(&value));
    }

    pub fn coder(&self) -> Option<&str> {
        self.coder.as_deref()
    }

    /// Subscribes to one topic. The callback runs synchronously after each
    /// write that changes it.
    pub fn observe(
        &mut self,
        topic: Topic,
        callback: impl FnMut(&Change<'_>) + 'static,
    ) -> ObserverId {
        self.observers.subscribe(topic, callback)
    }

    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Creates one code, filling defaults, and logs a `create` event.
    pub fn create_code(&mut self, input: NewCode) -> StoreResult<Code> {
        let code = self.insert_code(input)?;
        info!(
            "event=code_create module=store status=ok code_id={} level={} parent={}",
            code.id,
            code.level,
            code.parent_id.as_deref().unwrap_or("-")
        );
        self.commit(&[Source::Codes, Source::Events]);
        Ok(code)
    }

    /// Unions `rows` into the code's assignment set and logs an `apply`
    /// event carrying the requested rows.
    pub fn apply_code(&mut self, code_id: &str, rows: &[RowId]) -> StoreResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        self.ensure_code(code_id)?;

        let added = self.assignments.apply(code_id, rows);
        self.record(CodingAction::Apply, code_id, rows.to_vec(), None);
        info!(
            "event=code_apply module=store status=ok code_id={code_id} requested={} added={added}",
            rows.len()
        );
        self.commit(&changed_with_events(added > 0));
        Ok(())
    }

    /// Removes `rows` from the code's assignment set and logs a `remove`
    /// event carrying the requested rows, present or not.
    pub fn remove_code(&mut self, code_id: &str, rows: &[RowId]) -> StoreResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        self.ensure_code(code_id)?;

        let removed = self.assignments.remove(code_id, rows);
        self.record(CodingAction::Remove, code_id, rows.to_vec(), None);
        info!(
            "event=code_remove module=store status=ok code_id={code_id} requested={} removed={removed}",
            rows.len()
        );
        self.commit(&changed_with_events(removed > 0));
        Ok(())
    }

    /// Moves every row of `source_id` onto `target_id` and logs a `merge`
    /// event on the target. Returns how many rows were moved.
    pub fn merge_codes(&mut self, source_id: &str, target_id: &str) -> StoreResult<usize> {
        if source_id == target_id {
            return Err(StoreError::InvalidInput(format!(
                "cannot merge code {source_id} into itself"
            )));
        }
        self.ensure_code(source_id)?;
        self.ensure_code(target_id)?;

        let moved: Vec<RowId> = self.assignments.take(source_id).into_iter().collect();
        self.assignments.apply(target_id, &moved);
        self.record(
            CodingAction::Merge,
            target_id,
            moved.clone(),
            Some(format!("merged from {source_id}")),
        );
        info!(
            "event=code_merge module=store status=ok source={source_id} target={target_id} moved={}",
            moved.len()
        );
        self.commit(&changed_with_events(!moved.is_empty()));
        Ok(moved.len())
    }

    /// Creates a child code and moves `rows` from `source_id` onto it.
    ///
    /// The new code's parent defaults to `source_id`. Logs `create` for the
    /// new code, then `split` on the source.
    pub fn split_code(
        &mut self,
        source_id: &str,
        input: NewCode,
        rows: &[RowId],
    ) -> StoreResult<Code> {
        self.ensure_code(source_id)?;
        if rows.is_empty() {
            return Err(StoreError::InvalidInput(
                "split requires at least one row".to_string(),
            ));
        }
        if let Some(row) = rows
            .iter()
            .find(|row| !self.assignments.contains(source_id, row))
        {
            return Err(StoreError::InvalidInput(format!(
                "row {row} is not assigned to {source_id}"
            )));
        }

        let input = NewCode {
            parent_id: input.parent_id.or_else(|| Some(source_id.to_string())),
            ..input
        };
        let code = self.insert_code(input)?;
        self.assignments.remove(source_id, rows);
        self.assignments.apply(&code.id, rows);
        self.record(
            CodingAction::Split,
            source_id,
            rows.to_vec(),
            Some(format!("split into {}", code.id)),
        );
        info!(
            "event=code_split module=store status=ok source={source_id} code_id={} moved={}",
            code.id,
            rows.len()
        );
        self.commit(&[Source::Codes, Source::Assignments, Source::Events]);
        Ok(code)
    }

    /// Creates one memo at the front of the memo registry.
    pub fn create_memo(&mut self, input: NewMemo) -> StoreResult<Memo> {
        for code_id in &input.linked_codes {
            self.ensure_code(code_id)?;
        }
        if let Some(blank) = input.tags.iter().find(|tag| tag.trim().is_empty()) {
            return Err(StoreError::InvalidInput(format!("invalid tag: `{blank}`")));
        }

        let memo = Memo {
            id: self.ids.create_id(MEMO_ID_PREFIX),
            tags: normalize_tags(&input.tags),
            content: input.content,
            linked_codes: input.linked_codes,
            linked_data_point_ids: input.linked_data_point_ids,
            memo_type: input.memo_type,
            created_at: self.clock.now(),
        };
        self.memos.prepend(memo.clone());
        info!(
            "event=memo_create module=store status=ok memo_id={} type={} linked_codes={}",
            memo.id,
            memo.memo_type.as_str(),
            memo.linked_codes.len()
        );
        self.commit(&[Source::Memos]);
        Ok(memo)
    }

    /// Records a directed typed edge between two registered codes.
    pub fn create_relation(&mut self, input: NewRelation) -> StoreResult<CodeRelation> {
        self.ensure_code(&input.from_code)?;
        self.ensure_code(&input.to_code)?;
        if let Some(strength) = input.strength.filter(|value| !value.is_finite()) {
            return Err(StoreError::InvalidInput(format!(
                "relation strength must be finite, got {strength}"
            )));
        }
        if input.from_code == input.to_code {
            warn!(
                "event=relation_create module=store status=ok self_loop=true code_id={}",
                input.from_code
            );
        }

        let relation = CodeRelation {
            id: self.ids.create_id(RELATION_ID_PREFIX),
            from_code: input.from_code,
            to_code: input.to_code,
            relation_type: input.relation_type,
            strength: input.strength,
            notes: input.notes,
        };
        self.relations.append(relation.clone());
        info!(
            "event=relation_create module=store status=ok relation_id={} type={:?}",
            relation.id, relation.relation_type
        );
        self.commit(&[Source::Relations]);
        Ok(relation)
    }

    /// Registers one actor.
    pub fn add_actor(&mut self, input: NewActor) -> StoreResult<Actor> {
        let name = match input.name {
            Some(value) => normalize_name(&value).ok_or_else(|| {
                StoreError::InvalidInput("actor name must not be blank".to_string())
            })?,
            None => DEFAULT_ACTOR_NAME.to_string(),
        };
        let color = self.resolve_color(input.color.as_deref(), self.actors.len())?;

        let actor = Actor {
            id: self.ids.create_id(ACTOR_ID_PREFIX),
            name,
            description: input.description.unwrap_or_default(),
            color,
            actor_type: input.actor_type,
            created_at: self.clock.now(),
        };
        self.actors.append(actor.clone());
        info!(
            "event=actor_create module=store status=ok actor_id={} type={:?}",
            actor.id, actor.actor_type
        );
        self.commit(&[Source::Actors]);
        Ok(actor)
    }

    /// Records a typed translation between two registered actors.
    pub fn add_actor_link(&mut self, input: NewActorLink) -> StoreResult<ActorLink> {
        self.ensure_actor(&input.from_actor)?;
        self.ensure_actor(&input.to_actor)?;

        let link = ActorLink {
            id: self.ids.create_id(ACTOR_LINK_ID_PREFIX),
            from_actor: input.from_actor,
            to_actor: input.to_actor,
            translation_type: input.translation_type,
            data_point_ids: input.data_point_ids,
            notes: input.notes,
        };
        self.actor_links.append(link.clone());
        info!(
            "event=actor_link_create module=store status=ok link_id={} type={:?} rows={}",
            link.id,
            link.translation_type,
            link.data_point_ids.len()
        );
        self.commit(&[Source::ActorLinks]);
        Ok(link)
    }

    /// Records a code observed on some rows over a time window.
    pub fn add_temporal_code(&mut self, input: NewTemporalCode) -> StoreResult<TemporalCode> {
        self.ensure_code(&input.code_id)?;
        if let Some(end) = input.end.filter(|end| *end < input.start) {
            return Err(StoreError::InvalidInput(format!(
                "temporal code end {end} precedes start {}",
                input.start
            )));
        }

        let temporal = TemporalCode {
            id: self.ids.create_id(TEMPORAL_CODE_ID_PREFIX),
            code_id: input.code_id,
            data_point_ids: input.data_point_ids,
            start: input.start,
            end: input.end,
            notes: input.notes,
        };
        self.temporal_codes.append(temporal.clone());
        info!(
            "event=temporal_code_create module=store status=ok temporal_id={} code_id={}",
            temporal.id, temporal.code_id
        );
        self.commit(&[Source::TemporalCodes]);
        Ok(temporal)
    }

    pub fn codes(&self) -> &[Code] {
        self.codes.as_slice()
    }

    pub fn code(&self, code_id: &str) -> Option<&Code> {
        self.codes.get(code_id)
    }

    /// Newest first.
    pub fn memos(&self) -> &[Memo] {
        self.memos.as_slice()
    }

    pub fn relations(&self) -> &[CodeRelation] {
        self.relations.as_slice()
    }

    pub fn actors(&self) -> &[Actor] {
        self.actors.as_slice()
    }

    pub fn actor_links(&self) -> &[ActorLink] {
        self.actor_links.as_slice()
    }

    pub fn temporal_codes(&self) -> &[TemporalCode] {
        self.temporal_codes.as_slice()
    }

    pub fn events(&self) -> &[CodingEvent] {
        self.audit.as_slice()
    }

    pub fn assignments(&self) -> &AssignmentTable {
        &self.assignments
    }

    pub fn frequency(&self, code_id: &str) -> usize {
        self.assignments.frequency(code_id)
    }

    /// Direct children in registry order.
    pub fn children_of(&self, code_id: &str) -> Vec<&Code> {
        self.codes
            .iter()
            .filter(|code| code.parent_id.as_deref() == Some(code_id))
            .collect()
    }

    /// Ancestors of `code_id` followed by the code itself, root first.
    pub fn code_path(&self, code_id: &str) -> StoreResult<Vec<&Code>> {
        let mut current = self.ensure_code(code_id)?;
        let mut path = vec![current];
        while let Some(parent_id) = current.parent_id.as_deref() {
            if path.iter().any(|code| code.id == parent_id) {
                break;
            }
            current = self.ensure_code(parent_id)?;
            path.push(current);
        }
        path.reverse();
        Ok(path)
    }

    pub fn memos_for_code(&self, code_id: &str) -> Vec<&Memo> {
        self.memos
            .iter()
            .filter(|memo| memo.linked_codes.iter().any(|id| id == code_id))
            .collect()
    }

    pub fn relations_for_code(&self, code_id: &str) -> Vec<&CodeRelation> {
        self.relations
            .iter()
            .filter(|relation| relation.touches(code_id))
            .collect()
    }

    pub fn assignments_by_row(&self) -> &AssignmentsByRow {
        &self.derived.values().assignments_by_row
    }

    pub fn codes_with_frequency(&self) -> &[Code] {
        &self.derived.values().codes_with_frequency
    }

    pub fn cooccurrence(&self) -> &Cooccurrence {
        &self.derived.values().cooccurrence
    }

    pub fn saturation(&self) -> Saturation {
        self.derived.values().saturation
    }

    /// Renders the REFI-QDA document for the current state.
    pub fn export_refi_qda(&self) -> Result<String, ExportError> {
        export::to_xml_string(self.codes(), self.memos(), &self.assignments)
    }

    /// UTF-8 bytes of `export_refi_qda`, ready for `EXPORT_FILE_NAME`.
    pub fn export_refi_qda_bytes(&self) -> Result<Vec<u8>, ExportError> {
        export::write_refi_qda(Vec::new(), self.codes(), self.memos(), &self.assignments)
    }

    pub fn snapshot(&self) -> ProjectSnapshot {
        let values = self.derived.values();
        ProjectSnapshot {
            codes: values.codes_with_frequency.clone(),
            memos: self.memos().to_vec(),
            relations: self.relations().to_vec(),
            actors: self.actors().to_vec(),
            actor_links: self.actor_links().to_vec(),
            temporal_codes: self.temporal_codes().to_vec(),
            assignments: self
                .assignments
                .iter()
                .map(|(code_id, rows)| (code_id.clone(), rows.iter().cloned().collect()))
                .collect(),
            events: self.events().to_vec(),
            cooccurrence: values.cooccurrence.clone(),
            saturation: values.saturation,
        }
    }

    fn ensure_code(&self, code_id: &str) -> StoreResult<&Code> {
        self.codes.get(code_id).ok_or_else(|| {
            debug!("event=code_lookup module=store status=error code_id={code_id}");
            StoreError::CodeNotFound(code_id.to_string())
        })
    }

    fn ensure_actor(&self, actor_id: &str) -> StoreResult<&Actor> {
        self.actors
            .get(actor_id)
            .ok_or_else(|| StoreError::ActorNotFound(actor_id.to_string()))
    }

    fn resolve_color(&self, requested: Option<&str>, index: usize) -> StoreResult<String> {
        match requested {
            Some(value) => normalize_color(value)
                .ok_or_else(|| StoreError::InvalidInput(format!("invalid color: `{value}`"))),
            None => Ok(self.config.palette_color(index)),
        }
    }

    /// Validates and appends one code plus its `create` event, without
    /// propagating.
    fn insert_code(&mut self, input: NewCode) -> StoreResult<Code> {
        let name = match input.name {
            Some(value) => normalize_name(&value).ok_or_else(|| {
                StoreError::InvalidInput("code name must not be blank".to_string())
            })?,
            None => DEFAULT_CODE_NAME.to_string(),
        };
        let color = self.resolve_color(input.color.as_deref(), self.codes.len())?;
        if let Some(parent_id) = input.parent_id.as_deref() {
            self.ensure_code(parent_id)?;
        }

        let created_at = self.clock.now();
        let code = Code {
            id: self.ids.create_id(CODE_ID_PREFIX),
            name,
            description: input.description.unwrap_or_default(),
            color,
            parent_id: input.parent_id,
            level: input.level.unwrap_or_default(),
            created_at,
            created_by: input.created_by.clone(),
            frequency: 0,
            actor_type: input.actor_type,
        };
        self.codes.append(code.clone());

        let coder = input.created_by.or_else(|| self.coder.clone());
        self.audit.append(
            CodingEvent::new(created_at, CodingAction::Create, code.id.clone(), Vec::new())
                .with_coder(coder),
        );
        Ok(code)
    }

    fn record(
        &mut self,
        action: CodingAction,
        code_id: &str,
        rows: Vec<RowId>,
        notes: Option<String>,
    ) {
        let mut event = CodingEvent::new(self.clock.now(), action, code_id, rows)
            .with_coder(self.coder.clone());
        if let Some(notes) = notes {
            event = event.with_notes(notes);
        }
        self.audit.append(event);
    }

    /// Recomputes derived values reachable from `changed`, then notifies
    /// source observers followed by derived observers.
    fn commit(&mut self, changed: &[Source]) {
        let updated = self.derived.propagate(
            changed,
            GraphInputs {
                codes: self.codes.as_slice(),
                assignments: &self.assignments,
                events: &self.audit,
            },
        );
        debug!(
            "event=derived_propagate module=analytics status=ok sources={changed:?} updated={updated:?}"
        );
        if self.observers.is_empty() {
            return;
        }

        for source in changed {
            let change = match source {
                Source::Codes => Change::Codes(self.codes.as_slice()),
                Source::Memos => Change::Memos(self.memos.as_slice()),
                Source::Relations => Change::Relations(self.relations.as_slice()),
                Source::Actors => Change::Actors(self.actors.as_slice()),
                Source::ActorLinks => Change::ActorLinks(self.actor_links.as_slice()),
                Source::TemporalCodes => Change::TemporalCodes(self.temporal_codes.as_slice()),
                Source::Assignments => Change::Assignments(&self.assignments),
                Source::Events => Change::Events(self.audit.as_slice()),
            };
            self.observers.notify(&change);
        }

        let values = self.derived.values();
        for node in updated {
            let change = match node {
                Derived::AssignmentsByRow => Change::AssignmentsByRow(&values.assignments_by_row),
                Derived::CodesWithFrequency => {
                    Change::CodesWithFrequency(&values.codes_with_frequency)
                }
                Derived::Cooccurrence => Change::Cooccurrence(&values.cooccurrence),
                Derived::Saturation => Change::Saturation(&values.saturation),
            };
            self.observers.notify(&change);
        }
    }
}

fn changed_with_events(assignments_changed: bool) -> Vec<Source> {
    if assignments_changed {
        vec![Source::Assignments, Source::Events]
    } else {
        vec![Source::Events]
    }
}
