//! Required-field validation.
//!
//! Typed constructors already guarantee presence; what remains to check is
//! that required identifiers are not blank. An invalid event is dropped by
//! the emitter with a diagnostic and never reaches a transport.

use crate::error::ValidationError;

use super::entities::{AdEntity, ArticleEntity};
use super::types::{AnalyticsEvent, MediaEvent};

fn require(kind: &'static str, field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::missing(kind, field))
    } else {
        Ok(())
    }
}

fn require_article(kind: &'static str, article: &ArticleEntity) -> Result<(), ValidationError> {
    require(kind, "article_id", &article.article_id)?;
    require(kind, "title", &article.title)
}

fn require_ad(kind: &'static str, ad: &AdEntity) -> Result<(), ValidationError> {
    require(kind, "ad_id", &ad.ad_id)
}

impl AnalyticsEvent {
    /// Check required fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let kind = self.kind().as_str();
        match self {
            AnalyticsEvent::PageView { path, .. } => require(kind, "path", path),
            AnalyticsEvent::ArticleView { article } => require_article(kind, article),
            AnalyticsEvent::SearchQuick { term, article } => {
                require(kind, "term", term)?;
                require_article(kind, article)
            }
            AnalyticsEvent::SearchFull { term, articles, .. } => {
                require(kind, "term", term)?;
                articles
                    .iter()
                    .try_for_each(|article| require(kind, "article_id", &article.article_id))
            }
            AnalyticsEvent::AdImpression { ad } | AnalyticsEvent::AdClick { ad } => {
                require_ad(kind, ad)
            }
            AnalyticsEvent::NewsletterSignup { ab_test } => match ab_test {
                Some(test) => {
                    require(kind, "experiment_id", &test.experiment_id)?;
                    require(kind, "variant_id", &test.variant_id)
                }
                None => Ok(()),
            },
            AnalyticsEvent::FunnelStep { .. } | AnalyticsEvent::LoginSuccess { .. } => Ok(()),
            AnalyticsEvent::Consent { document, .. } => {
                if document.consent_scopes.is_empty() {
                    return Err(ValidationError::missing(kind, "consent_scopes"));
                }
                require(kind, "consent_version", &document.consent_version)
            }
            AnalyticsEvent::CmpVisible { elapsed_time_ms } => {
                if elapsed_time_ms.is_finite() && *elapsed_time_ms >= 0.0 {
                    Ok(())
                } else {
                    Err(ValidationError::missing(kind, "elapsed_time"))
                }
            }
            AnalyticsEvent::MediaEvent { media_id, media } => {
                require(kind, "media_id", media_id)?;
                match media {
                    MediaEvent::Progress { player } if !player.duration.is_finite() => {
                        Err(ValidationError::missing(kind, "duration"))
                    }
                    _ => Ok(()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::entities::AbTest;
    use crate::events::types::PlayerSnapshot;

    #[test]
    fn test_blank_article_id_rejected() {
        let event = AnalyticsEvent::ArticleView {
            article: ArticleEntity::new("  ", "Title", "Author", "AI"),
        };
        assert_eq!(
            event.validate(),
            Err(ValidationError::missing("article_view", "article_id"))
        );
    }

    #[test]
    fn test_search_full_requires_term() {
        let event = AnalyticsEvent::SearchFull {
            term: String::new(),
            total_results: 0,
            articles: vec![],
        };
        assert_eq!(
            event.validate(),
            Err(ValidationError::missing("search_full", "term"))
        );
    }

    #[test]
    fn test_ab_test_ids_required_when_present() {
        let event = AnalyticsEvent::NewsletterSignup {
            ab_test: Some(AbTest {
                experiment_id: "exp-1".into(),
                experiment_name: None,
                variant_id: "".into(),
                variant_name: None,
            }),
        };
        assert!(event.validate().is_err());
        assert!(AnalyticsEvent::NewsletterSignup { ab_test: None }
            .validate()
            .is_ok());
    }

    #[test]
    fn test_media_progress_needs_finite_duration() {
        let event = AnalyticsEvent::MediaEvent {
            media_id: "video".into(),
            media: MediaEvent::Progress {
                player: PlayerSnapshot {
                    current_time: 1.0,
                    duration: f64::NAN,
                    paused: false,
                    volume: 100,
                    fullscreen: false,
                },
            },
        };
        assert!(event.validate().is_err());
    }

    #[test]
    fn test_valid_ad_click() {
        let event = AnalyticsEvent::AdClick {
            ad: AdEntity::new("cloud-solutions"),
        };
        assert!(event.validate().is_ok());
    }
}
