use std::fmt;

use ac_core::settings::PolicySettings;
use ac_core::unicode::is_non_compositional;

/// Decides on which input surfaces suggestion requests are advisable.
pub struct SurfacePolicy {
    eligible: Box<dyn Fn(&str) -> bool>,
    allow_non_compositional: bool,
}

impl SurfacePolicy {
    /// Surfaces whose identifier contains any `restricted_surfaces` entry
    /// are not eligible.
    pub fn from_settings(settings: &PolicySettings) -> Self {
        let restricted = settings.restricted_surfaces.clone();
        Self {
            eligible: Box::new(move |id| !restricted.iter().any(|r| id.contains(r.as_str()))),
            allow_non_compositional: settings.allow_non_compositional,
        }
    }

    pub fn with_predicate(
        predicate: impl Fn(&str) -> bool + 'static,
        allow_non_compositional: bool,
    ) -> Self {
        Self {
            eligible: Box::new(predicate),
            allow_non_compositional,
        }
    }

    pub fn is_suggestion_eligible_input_surface(&self, surface_id: &str) -> bool {
        (self.eligible)(surface_id)
    }

    /// Unknown surfaces are allowed. A restricted surface is still allowed
    /// while the user text is plain non-compositional script, if enabled.
    pub fn allows(&self, surface_id: Option<&str>, user_text: &str) -> bool {
        match surface_id {
            None => true,
            Some(id) if self.is_suggestion_eligible_input_surface(id) => true,
            Some(_) => self.allow_non_compositional && is_non_compositional(user_text),
        }
    }
}

impl fmt::Debug for SurfacePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfacePolicy")
            .field("allow_non_compositional", &self.allow_non_compositional)
            .finish_non_exhaustive()
    }
}
