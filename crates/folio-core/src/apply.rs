//! The update applier
//!
//! A pure function from (document, envelope) to the mutated document.
//! No I/O, no clock reads: entity timestamps come from the envelope and
//! ids are derived from document state, so applying the same envelope to
//! the same document always produces the same result.
//!
//! Missing-id updates, deletes, and toggles are silent no-ops.

use chrono::{DateTime, Utc};

use crate::document::{Document, VISITOR_LOG_CAP};
use crate::models::{Entity, EntityId, SkillGroups};
use crate::update::{CollectionOp, SkillOp, Update, UpdateEnvelope};

/// Apply one envelope to the document
pub fn apply_update(doc: &mut Document, envelope: &UpdateEnvelope) {
    let at = envelope.recorded_at;

    match &envelope.update {
        Update::Certificate(op) => apply_collection(&mut doc.certificates, op, at),
        Update::Project(op) => apply_collection(&mut doc.projects, op, at),
        Update::BlogPost(op) => apply_collection(&mut doc.blog_posts, op, at),
        Update::SocialLink(op) => apply_collection(&mut doc.social_links, op, at),
        Update::Skills(op) => apply_skills(&mut doc.skills, op),
        Update::SiteContent { pages } => doc.site_content.merge_pages(pages.clone()),
        Update::Visitor(entry) => {
            doc.visitor_logs.insert(0, entry.clone());
            doc.visitor_logs.truncate(VISITOR_LOG_CAP);
        }
        Update::Replace(new_doc) => *doc = new_doc.clone(),
    }
}

fn apply_collection<E: Entity>(
    items: &mut Vec<E>,
    op: &CollectionOp<E::Draft, E::Patch>,
    at: DateTime<Utc>,
) {
    match op {
        CollectionOp::Create { draft } => {
            let id = next_id(items);
            items.push(E::create(id, at, draft.clone()));
        }
        CollectionOp::Update { id, patch } => {
            if let Some(item) = items.iter_mut().find(|item| item.id() == *id) {
                item.apply_patch(patch.clone());
                item.touch(at);
            }
        }
        CollectionOp::Delete { id } => {
            items.retain(|item| item.id() != *id);
        }
        CollectionOp::ToggleStatus { id, active } => {
            if let Some(item) = items.iter_mut().find(|item| item.id() == *id) {
                item.set_active(*active);
                item.touch(at);
            }
        }
    }
}

/// Next id in a collection: one past the highest id ever present keeps
/// ids unique without a separate counter.
fn next_id<E: Entity>(items: &[E]) -> EntityId {
    items.iter().map(Entity::id).max().unwrap_or(0) + 1
}

fn apply_skills(skills: &mut SkillGroups, op: &SkillOp) {
    match op {
        SkillOp::AddSkill { category, skill } => {
            if let Some(entries) = skills.get_mut(category) {
                if !entries.contains(skill) {
                    entries.push(skill.clone());
                }
            }
        }
        SkillOp::RemoveSkill { category, skill } => {
            if let Some(entries) = skills.get_mut(category) {
                entries.retain(|entry| entry != skill);
            }
        }
        SkillOp::UpdateSkill { category, from, to } => {
            if let Some(entries) = skills.get_mut(category) {
                if let Some(pos) = entries.iter().position(|entry| entry == from) {
                    entries[pos] = to.clone();
                }
            }
        }
        SkillOp::AddCategory { category } => {
            skills.entry(category.clone()).or_default();
        }
        SkillOp::RemoveCategory { category } => {
            skills.remove(category);
        }
    }
}
