//! Per-process session context.

use attrix_core::identity::SessionIdentity;

/// The session a tracker instance runs in.
///
/// A fresh session identity is generated on every tracker construction.
/// `entered_from` is set when the previously persisted site differs from
/// the current one — the cross-site transition the attribution layer
/// cares about.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session: SessionIdentity,
    pub site: String,
    pub entered_from: Option<String>,
}

impl SessionContext {
    /// Starts a session for `site`, given the site the visitor was last
    /// seen on (if any).
    pub fn start(site: impl Into<String>, previous_site: Option<String>) -> Self {
        let site = site.into();
        let entered_from = previous_site.filter(|previous| previous != &site);
        Self {
            session: SessionIdentity::generate(),
            site,
            entered_from,
        }
    }

    /// Whether this session began by crossing over from another site.
    pub fn is_cross_site_entry(&self) -> bool {
        self.entered_from.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_visit_is_not_a_transition() {
        let context = SessionContext::start("landing", None);
        assert!(!context.is_cross_site_entry());
    }

    #[test]
    fn test_same_site_is_not_a_transition() {
        let context = SessionContext::start("landing", Some("landing".to_string()));
        assert!(!context.is_cross_site_entry());
        assert_eq!(context.entered_from, None);
    }

    #[test]
    fn test_site_change_is_a_transition() {
        let context = SessionContext::start("docs", Some("landing".to_string()));
        assert!(context.is_cross_site_entry());
        assert_eq!(context.entered_from.as_deref(), Some("landing"));
    }

    #[test]
    fn test_each_session_gets_a_fresh_identity() {
        let a = SessionContext::start("landing", None);
        let b = SessionContext::start("landing", None);
        assert_ne!(a.session.id, b.session.id);
    }
}
