/// Describes one of the effects built into the firmware.
#[derive(Debug, PartialEq, Eq)]
pub struct EffectDescriptor {
  /// The id sent in `EFFECT:<id>`; equal to the descriptor's position in `EFFECTS`.
  pub id: u8,

  /// Display name.
  pub name: &'static str,

  /// One line description.
  pub description: &'static str,

  /// Loose grouping used when listing.
  pub category: &'static str,
}

/// Shorthand for the table below.
const fn effect(
  id: u8,
  name: &'static str,
  description: &'static str,
  category: &'static str,
) -> EffectDescriptor {
  EffectDescriptor {
    id,
    name,
    description,
    category,
  }
}

/// Number of effects; valid ids are `0..COUNT`.
pub const COUNT: usize = 20;

/// The highest valid effect id.
pub const LAST_ID: u8 = (COUNT - 1) as u8;

/// The effect catalog, ordered by id.
pub static EFFECTS: [EffectDescriptor; COUNT] = [
  effect(0, "Lightning", "Lightning flashes", "Atmosphere"),
  effect(1, "Meteor", "Running tail", "Motion"),
  effect(2, "Strobe", "Stroboscope", "Party"),
  effect(3, "Firework", "Firework bursts", "Party"),
  effect(4, "Confetti", "Colorful confetti", "Party"),
  effect(5, "Rainbow Glitter", "Rainbow with glitter", "Colors"),
  effect(6, "Rapid Color Change", "Fast color changes", "Colors"),
  effect(7, "Police", "Emergency lights", "Simulation"),
  effect(8, "Energy Wave", "Energy waves", "Sci-Fi"),
  effect(9, "Solid Color", "Single color", "Basic"),
  effect(10, "Theater Chase", "Chasing lights", "Motion"),
  effect(11, "Breathing", "Gentle breathing", "Relaxation"),
  effect(12, "Color Wipe", "Color wave", "Motion"),
  effect(13, "Fire", "Fire simulation", "Simulation"),
  effect(14, "Plasma", "Plasma pattern", "Sci-Fi"),
  effect(15, "Sparkle", "Sparkling", "Atmosphere"),
  effect(16, "Running Lights", "Running segments", "Motion"),
  effect(17, "Twinkle", "Stars", "Atmosphere"),
  effect(18, "Bouncing Balls", "Bouncing balls", "Physics"),
  effect(19, "Matrix Rain", "Digital rain", "Sci-Fi"),
];

/// Checked lookup.
pub fn get(id: usize) -> Option<&'static EffectDescriptor> {
  EFFECTS.get(id)
}

/// Unchecked lookup. Callers are expected to have bounds-checked `id` already; an out of range id is
/// a programming error and panics.
pub fn lookup(id: usize) -> &'static EffectDescriptor {
  assert!(id < COUNT, "effect id {id} outside of catalog (0..{COUNT})");
  &EFFECTS[id]
}
