use serde::{Deserialize, Serialize};

use crate::config::CallToActionLinks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallToActionVariant {
    Booking,
    Resources,
}

impl CallToActionVariant {
    pub const fn for_qualification(qualified: bool) -> Self {
        if qualified {
            Self::Booking
        } else {
            Self::Resources
        }
    }

    pub const fn headline(self) -> &'static str {
        match self {
            Self::Booking => "Ready to Discuss Your Plan?",
            Self::Resources => "Explore Our Resources",
        }
    }

    pub const fn body(self) -> &'static str {
        match self {
            Self::Booking => "Our senior technical team reviews early-stage device concepts at no cost. We'll tell you what we see - including whether now is the right time to move forward.",
            Self::Resources => "Learn more about medical device development with our educational resources and case studies.",
        }
    }

    pub const fn link_label(self) -> &'static str {
        match self {
            Self::Booking => "Book Free Project Review",
            Self::Resources => "Browse Resources",
        }
    }

    pub fn link_url(self, links: &CallToActionLinks) -> &str {
        match self {
            Self::Booking => &links.booking_url,
            Self::Resources => &links.resources_url,
        }
    }
}

/// Call-to-action block, selected once at assembly time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToAction {
    pub variant: CallToActionVariant,
    pub headline: String,
    pub body: String,
    pub link_label: String,
    pub link_url: String,
}

impl CallToAction {
    pub fn select(qualified: bool, links: &CallToActionLinks) -> Self {
        let variant = CallToActionVariant::for_qualification(qualified);
        Self {
            variant,
            headline: variant.headline().to_string(),
            body: variant.body().to_string(),
            link_label: variant.link_label().to_string(),
            link_url: variant.link_url(links).to_string(),
        }
    }

    pub fn shows_booking(&self) -> bool {
        self.variant == CallToActionVariant::Booking
    }
}
