//! Krumhansl-Schmuckler key templates
//!
//! Defines tonal profiles for 24 keys (12 major + 12 minor), each normalized to
//! unit sum and rotated to its tonic.

/// Krumhansl-Kessler major profile (tonic first)
pub const MAJOR_PROFILE: [f64; 12] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];

/// Krumhansl-Kessler minor profile (tonic first)
pub const MINOR_PROFILE: [f64; 12] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

/// Key templates for all 24 keys
#[derive(Debug, Clone, PartialEq)]
pub struct KeyTemplates {
    /// Major key templates (12 keys: C, C#, D, ..., B)
    pub major: [[f64; 12]; 12],

    /// Minor key templates (12 keys: C, C#, D, ..., B)
    pub minor: [[f64; 12]; 12],
}

impl KeyTemplates {
    /// Create templates from the Krumhansl-Kessler profiles
    pub fn new() -> Self {
        Self {
            major: rotations(&normalized(&MAJOR_PROFILE)),
            minor: rotations(&normalized(&MINOR_PROFILE)),
        }
    }

    /// Major template for a tonic (0 = C, ..., 11 = B)
    pub fn get_major_template(&self, root: u32) -> &[f64; 12] {
        &self.major[root as usize % 12]
    }

    /// Minor template for a tonic (0 = C, ..., 11 = B)
    pub fn get_minor_template(&self, root: u32) -> &[f64; 12] {
        &self.minor[root as usize % 12]
    }
}

impl Default for KeyTemplates {
    fn default() -> Self {
        Self::new()
    }
}

fn normalized(profile: &[f64; 12]) -> [f64; 12] {
    let total: f64 = profile.iter().sum();
    profile.map(|v| v / total)
}

/// `rotated[root][pc] = profile[(pc - root + 12) % 12]`
fn rotations(profile: &[f64; 12]) -> [[f64; 12]; 12] {
    let mut rotated = [[0.0f64; 12]; 12];
    for (root, template) in rotated.iter_mut().enumerate() {
        for (pc, value) in template.iter_mut().enumerate() {
            *value = profile[(pc + 12 - root) % 12];
        }
    }
    rotated
}
