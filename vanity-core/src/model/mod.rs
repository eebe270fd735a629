//! Data model for vanity configurations, pricing and quotes.

mod configuration;
mod money;
mod pricing;
mod quote;

pub use configuration::{
    title_case, Brand, CabinetPosition, CountertopSelection, Dimension, DoorStyle, FixtureKind,
    FixtureSelection, Fixtures, HandleStyle, VanityConfiguration,
};
pub use money::Money;
pub use pricing::{LineCategory, LineItem, PricingBreakdown};
pub use quote::{quote_reference, CustomerInfo, ImageFormat, PreviewImage, QuoteArtifact};
