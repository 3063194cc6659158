//! The fixed echo message table.

use tend_core::{checkin::CheckInType, echo::EchoSource, relationship::RelationshipType};

use super::EchoContext;

/// One candidate message. Dynamic templates fall back to generic wording
/// when the context lacks the field they reference.
#[derive(Clone, Copy)]
pub enum Template {
  Fixed(&'static str),
  Dynamic(fn(&EchoContext) -> String),
}

impl Template {
  pub fn render(self, ctx: &EchoContext) -> String {
    match self {
      Self::Fixed(text) => text.to_owned(),
      Self::Dynamic(f) => f(ctx),
    }
  }
}

const CHECKIN: &[Template] = &[
  Template::Dynamic(reached_out),
  Template::Dynamic(made_time),
  Template::Dynamic(by_checkin_type),
  Template::Dynamic(by_relationship_type),
];

const DREAM: &[Template] = &[
  Template::Fixed("You clarified your vision. That's rare and powerful."),
  Template::Fixed("You reconnected with your purpose. That's grounding."),
  Template::Fixed("You made your dream visible. That brings it closer."),
  Template::Fixed("You articulated what matters. That creates direction."),
];

const GRATITUDE: &[Template] = &[
  Template::Fixed("You found a bright spot. That matters."),
  Template::Fixed("You noticed what's good. That shifts perspective."),
  Template::Fixed("You practiced gratitude. That builds resilience."),
  Template::Fixed("You appreciated a moment. That's mindfulness."),
];

/// All candidates for `source`. Never empty.
pub fn table(source: EchoSource) -> &'static [Template] {
  match source {
    EchoSource::Checkin => CHECKIN,
    EchoSource::Dream => DREAM,
    EchoSource::Gratitude => GRATITUDE,
  }
}

fn reached_out(ctx: &EchoContext) -> String {
  match &ctx.name {
    Some(name) => format!("You reached out to {name} today. That counts."),
    None => "You maintained a connection today. That matters.".to_owned(),
  }
}

fn made_time(ctx: &EchoContext) -> String {
  match &ctx.name {
    Some(name) => format!("You made time for {name}. That's relationship building."),
    None => "You prioritized a relationship today.".to_owned(),
  }
}

fn by_checkin_type(ctx: &EchoContext) -> String {
  match ctx.checkin_type {
    Some(CheckInType::Pinged) => "You initiated connection. That takes courage.",
    _ => "You held someone in your thoughts. That's care.",
  }
  .to_owned()
}

fn by_relationship_type(ctx: &EchoContext) -> String {
  match ctx.relationship_type {
    Some(RelationshipType::Family) => "You invested in family. That builds roots.",
    Some(RelationshipType::Friend) => "You nurtured a friendship. That creates support.",
    Some(RelationshipType::Partner) => {
      "You strengthened your partnership. That's love in action."
    }
    _ => "You showed up for your relationship. That builds trust.",
  }
  .to_owned()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ctx(name: Option<&str>, rel: RelationshipType, kind: CheckInType) -> EchoContext {
    EchoContext {
      relationship_id:   None,
      name:              name.map(str::to_owned),
      relationship_type: Some(rel),
      checkin_type:      Some(kind),
    }
  }

  #[test]
  fn every_source_has_four_candidates() {
    for source in [EchoSource::Checkin, EchoSource::Dream, EchoSource::Gratitude] {
      assert_eq!(table(source).len(), 4);
    }
  }

  #[test]
  fn checkin_templates_use_the_name_when_present() {
    let c = ctx(Some("Ada"), RelationshipType::Friend, CheckInType::Pinged);
    let rendered: Vec<_> = table(EchoSource::Checkin).iter().map(|t| t.render(&c)).collect();
    assert_eq!(rendered, vec![
      "You reached out to Ada today. That counts.",
      "You made time for Ada. That's relationship building.",
      "You initiated connection. That takes courage.",
      "You nurtured a friendship. That creates support.",
    ]);
  }

  #[test]
  fn checkin_templates_fall_back_without_context() {
    let c = EchoContext::default();
    let rendered: Vec<_> = table(EchoSource::Checkin).iter().map(|t| t.render(&c)).collect();
    assert_eq!(rendered, vec![
      "You maintained a connection today. That matters.",
      "You prioritized a relationship today.",
      "You held someone in your thoughts. That's care.",
      "You showed up for your relationship. That builds trust.",
    ]);
  }

  #[test]
  fn relationship_specific_wording() {
    let family = ctx(None, RelationshipType::Family, CheckInType::Thought);
    let mentor = ctx(None, RelationshipType::Mentor, CheckInType::Thought);
    assert_eq!(by_relationship_type(&family), "You invested in family. That builds roots.");
    assert_eq!(
      by_relationship_type(&mentor),
      "You showed up for your relationship. That builds trust."
    );
  }
}
