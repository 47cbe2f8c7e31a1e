//! Public landing page. Static content plus the call-to-action target.

use serde::Serialize;

use sweetshop_client::SessionHolder;
use sweetshop_core::{resolve, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stat {
    pub value: &'static str,
    pub label: &'static str,
}

pub static FEATURES: [Feature; 4] = [
    Feature {
        title: "Fresh Daily",
        description: "All our sweets are made fresh every day with premium ingredients",
    },
    Feature {
        title: "Fast Delivery",
        description: "Quick and reliable delivery to your doorstep within hours",
    },
    Feature {
        title: "Quality Assured",
        description: "100% satisfaction guarantee on all our products",
    },
    Feature {
        title: "Secure Payment",
        description: "Safe and secure payment options for your convenience",
    },
];

pub static CATEGORIES: [&str; 4] = ["Cakes", "Cookies", "Candies", "Cupcakes"];

pub static STATS: [Stat; 4] = [
    Stat { value: "500+", label: "Products" },
    Stat { value: "10k+", label: "Happy Customers" },
    Stat { value: "50+", label: "Varieties" },
    Stat { value: "4.9★", label: "Rating" },
];

/// Everything the home page draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub headline: &'static str,
    pub tagline: &'static str,
    pub features: &'static [Feature],
    pub categories: &'static [&'static str],
    pub stats: &'static [Stat],
    pub cta_heading: &'static str,
    /// Where "Shop Now" leads for the current visitor.
    pub cta_target: Route,
}

impl HomePage {
    pub async fn mount(session: &SessionHolder) -> Self {
        HomePage {
            headline: "Sweet Shop!",
            tagline: "Buy delicious sweets online. Browse, search, and purchase your favorite sweets easily.",
            features: &FEATURES,
            categories: &CATEGORIES,
            stats: &STATS,
            cta_heading: "Ready to Satisfy Your Sweet Tooth?",
            cta_target: cta_target(session).await,
        }
    }
}

/// The dashboard for customers; the router sends everyone else on.
pub async fn cta_target(session: &SessionHolder) -> Route {
    let session = session.current().await;
    resolve(Route::UserDashboard.path(), session.as_ref()).target()
}
