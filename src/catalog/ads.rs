//! Advertisement inventory and slot selection.

use crate::events::entities::{AdEntity, AdPlacement, AdType, CostModel};

/// Where an ad is rendered on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdSlot {
    Banner,
    Sponsored,
    Sidebar,
}

impl AdSlot {
    pub fn placement(&self) -> AdPlacement {
        match self {
            AdSlot::Banner => AdPlacement::Header,
            AdSlot::Sponsored => AdPlacement::ContentBody,
            AdSlot::Sidebar => AdPlacement::Sidebar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advertisement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub cta_text: &'static str,
    pub slots: &'static [AdSlot],
    pub category: &'static str,
    /// Lower wins.
    pub priority: u32,
    pub cost: f64,
    pub cost_model: CostModel,
    pub campaign_id: &'static str,
    pub advertiser_id: &'static str,
}

impl Advertisement {
    pub fn fits(&self, slot: AdSlot) -> bool {
        self.slots.contains(&slot)
    }

    /// Tracking entity for this ad rendered in `slot`.
    pub fn entity(&self, slot: AdSlot) -> AdEntity {
        AdEntity {
            advertiser_id: Some(self.advertiser_id.to_string()),
            campaign_id: Some(self.campaign_id.to_string()),
            placement: Some(slot.placement()),
            position: Some(1),
            ad_type: Some(AdType::Banner),
            cost: Some(self.cost),
            cost_model: Some(self.cost_model),
            ..AdEntity::new(self.id)
        }
    }
}

pub const ADVERTISEMENTS: &[Advertisement] = &[
    Advertisement {
        id: "cloud-solutions",
        title: "Boost Your Business with Cloud Solutions",
        description: "Discover how leading companies are scaling with enterprise cloud infrastructure.",
        cta_text: "Learn More",
        slots: &[AdSlot::Banner, AdSlot::Sponsored],
        category: "Technology",
        priority: 1,
        cost: 2.5,
        cost_model: CostModel::Cpc,
        campaign_id: "cloud-solutions-2025",
        advertiser_id: "enterprise-cloud-corp",
    },
    Advertisement {
        id: "professional-development",
        title: "Professional Development Courses",
        description: "Advance your career with expert-led courses in technology, business, and AI.",
        cta_text: "Explore Courses",
        slots: &[AdSlot::Sidebar],
        category: "Business",
        priority: 2,
        cost: 2.5,
        cost_model: CostModel::Cpc,
        campaign_id: "professional-dev-2025",
        advertiser_id: "skill-academy",
    },
    Advertisement {
        id: "ai-marketing",
        title: "The Future of Digital Marketing: AI-Powered Analytics",
        description: "See how industry leaders are using artificial intelligence to transform their marketing strategies and drive growth.",
        cta_text: "Read Case Study",
        slots: &[AdSlot::Sponsored],
        category: "AI",
        priority: 3,
        cost: 2.5,
        cost_model: CostModel::Cpc,
        campaign_id: "ai-marketing-2025",
        advertiser_id: "marketing-ai-solutions",
    },
    Advertisement {
        id: "data-privacy",
        title: "Protect Your Data with Enterprise Security",
        description: "Learn how top companies are implementing robust data protection strategies in the age of AI.",
        cta_text: "Get Security Guide",
        slots: &[AdSlot::Banner, AdSlot::Sidebar],
        category: "Technology",
        priority: 4,
        cost: 2.5,
        cost_model: CostModel::Cpc,
        campaign_id: "data-security-2025",
        advertiser_id: "cyber-security-pro",
    },
];

pub fn ad_by_id(id: &str) -> Option<&'static Advertisement> {
    ADVERTISEMENTS.iter().find(|ad| ad.id == id)
}

/// The ad to render in `slot`.
///
/// With a `category`, ads of that category are preferred; if none fits the
/// slot, any ad for the slot is used. Lowest priority number wins, ties go
/// to catalog order.
pub fn select_ad(slot: AdSlot, category: Option<&str>) -> Option<&'static Advertisement> {
    let best = |candidates: Vec<&'static Advertisement>| {
        candidates.into_iter().min_by_key(|ad| ad.priority)
    };

    let for_slot: Vec<&'static Advertisement> =
        ADVERTISEMENTS.iter().filter(|ad| ad.fits(slot)).collect();

    if let Some(category) = category {
        let preferred: Vec<&'static Advertisement> = for_slot
            .iter()
            .copied()
            .filter(|ad| ad.category == category)
            .collect();
        if let Some(ad) = best(preferred) {
            return Some(ad);
        }
    }
    best(for_slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_placements() {
        assert_eq!(AdSlot::Banner.placement(), AdPlacement::Header);
        assert_eq!(AdSlot::Sponsored.placement(), AdPlacement::ContentBody);
        assert_eq!(AdSlot::Sidebar.placement(), AdPlacement::Sidebar);
    }

    #[test]
    fn test_lowest_priority_wins() {
        assert_eq!(select_ad(AdSlot::Banner, None).unwrap().id, "cloud-solutions");
        assert_eq!(
            select_ad(AdSlot::Sidebar, None).unwrap().id,
            "professional-development"
        );
    }

    #[test]
    fn test_category_preference_with_fallback() {
        assert_eq!(
            select_ad(AdSlot::Sponsored, Some("AI")).unwrap().id,
            "ai-marketing"
        );
        assert_eq!(
            select_ad(AdSlot::Sidebar, Some("Technology")).unwrap().id,
            "data-privacy"
        );
        assert_eq!(
            select_ad(AdSlot::Sponsored, Some("Sports")).unwrap().id,
            "cloud-solutions"
        );
    }

    #[test]
    fn test_entity_fields() {
        let entity = ad_by_id("cloud-solutions")
            .unwrap()
            .entity(AdSlot::Sponsored);
        assert_eq!(entity.ad_id, "cloud-solutions");
        assert_eq!(entity.placement, Some(AdPlacement::ContentBody));
        assert_eq!(entity.position, Some(1));
        assert_eq!(entity.cost_model, Some(CostModel::Cpc));
        assert_eq!(entity.campaign_id.as_deref(), Some("cloud-solutions-2025"));

        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["type"], "banner");
        assert_eq!(json["placement"], "content_body");
    }
}
