//! Typed `data` payloads, one per component type.
//!
//! Every payload uses struct-level `#[serde(default)]`, so a partial or
//! absent payload decodes with the documented defaults from its `Default`
//! impl instead of failing.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use super::{ComponentDescriptor, ComponentType, Palette};

// ---------------------------------------------------------------------------
// Shared pieces
// ---------------------------------------------------------------------------

/// A labelled link used by navigation bars and footers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NavLink {
    #[validate(length(max = 60))]
    pub label: String,
    #[validate(length(max = 500))]
    pub href: String,
}

/// A question/answer pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FaqItem {
    #[validate(length(max = 300))]
    pub question: String,
    #[validate(length(max = 2000))]
    pub answer: String,
}

/// A customer quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Testimonial {
    #[validate(length(max = 100))]
    pub name: String,
    #[validate(length(max = 100))]
    pub role: Option<String>,
    #[validate(length(max = 1000))]
    pub quote: String,
    #[validate(length(max = 500))]
    pub avatar: Option<String>,
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NavbarData {
    #[validate(length(max = 100))]
    pub brand: String,
    #[validate(length(max = 500))]
    pub logo: Option<String>,
    #[validate(nested)]
    pub links: Vec<NavLink>,
    #[validate(length(max = 60))]
    pub cta_text: Option<String>,
    #[validate(length(max = 500))]
    pub cta_link: Option<String>,
    /// Site colours. The first navbar on a page sets the page's theme.
    pub theme: Option<Palette>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct HeroData {
    #[validate(length(max = 200))]
    pub title: String,
    #[validate(length(max = 500))]
    pub subtitle: String,
    #[validate(length(max = 500))]
    pub image: Option<String>,
    #[validate(length(max = 60))]
    pub button_text: Option<String>,
    #[validate(length(max = 500))]
    pub button_link: Option<String>,
}

impl Default for HeroData {
    fn default() -> Self {
        Self {
            title: "Welcome".into(),
            subtitle: String::new(),
            image: None,
            button_text: None,
            button_link: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AboutData {
    #[validate(length(max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub body: String,
    #[validate(length(max = 500))]
    pub image: Option<String>,
}

impl Default for AboutData {
    fn default() -> Self {
        Self {
            title: "About us".into(),
            body: String::new(),
            image: None,
        }
    }
}

/// Collection-backed sections share one shape and differ only in their
/// default title.
macro_rules! collection_section {
    ($name:ident, $default_title:literal) => {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
        #[serde(default)]
        pub struct $name {
            #[validate(length(max = 200))]
            pub title: String,
            #[validate(length(max = 500))]
            pub subtitle: String,
            /// Maximum number of items to show; `None` shows everything.
            #[validate(range(min = 1, max = 50))]
            pub limit: Option<u32>,
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    title: $default_title.into(),
                    subtitle: String::new(),
                    limit: None,
                }
            }
        }
    };
}

collection_section!(BlogData, "Latest posts");
collection_section!(ProductsData, "Our products");
collection_section!(CategoriesData, "Shop by category");
collection_section!(ServicesData, "Our services");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FaqData {
    #[validate(length(max = 200))]
    pub title: String,
    #[validate(nested)]
    pub items: Vec<FaqItem>,
}

impl Default for FaqData {
    fn default() -> Self {
        Self {
            title: "Frequently asked questions".into(),
            items: Vec::new(),
        }
    }
}

/// Pricing carries no payload of its own; plans come from the
/// pricing-plan collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingData {}

impl Validate for PricingData {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TestimonialsData {
    #[validate(length(max = 200))]
    pub title: String,
    #[validate(nested)]
    pub items: Vec<Testimonial>,
}

impl Default for TestimonialsData {
    fn default() -> Self {
        Self {
            title: "What our customers say".into(),
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ContactData {
    #[validate(length(max = 200))]
    pub title: String,
    #[validate(length(max = 500))]
    pub subtitle: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(length(max = 300))]
    pub address: Option<String>,
    pub show_form: bool,
}

impl Default for ContactData {
    fn default() -> Self {
        Self {
            title: "Contact us".into(),
            subtitle: String::new(),
            email: None,
            phone: None,
            address: None,
            show_form: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppointmentData {
    #[validate(length(max = 200))]
    pub title: String,
    #[validate(length(max = 500))]
    pub subtitle: String,
    /// Service names offered in the booking form.
    pub services: Vec<String>,
    #[validate(range(min = 5, max = 480))]
    pub slot_minutes: Option<u32>,
}

impl Default for AppointmentData {
    fn default() -> Self {
        Self {
            title: "Book an appointment".into(),
            subtitle: String::new(),
            services: Vec::new(),
            slot_minutes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OrderConfirmationData {
    #[validate(length(max = 200))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub message: String,
    #[validate(length(max = 500))]
    pub continue_link: Option<String>,
}

impl Default for OrderConfirmationData {
    fn default() -> Self {
        Self {
            title: "Thank you for your order".into(),
            message: "We have received your order and will contact you shortly.".into(),
            continue_link: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct YoutubeData {
    #[validate(length(max = 200))]
    pub title: String,
    #[validate(url)]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FooterData {
    #[validate(length(max = 100))]
    pub brand: String,
    #[validate(length(max = 500))]
    pub description: String,
    #[validate(nested)]
    pub links: Vec<NavLink>,
    #[validate(length(max = 200))]
    pub copyright: Option<String>,
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

macro_rules! descriptor {
    ($marker:ident, $variant:ident, $data:ty) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $marker;

        impl ComponentDescriptor for $marker {
            const TYPE: ComponentType = ComponentType::$variant;
            type Data = $data;
        }
    };
}

descriptor!(Navbar, Navbar, NavbarData);
descriptor!(Hero, Hero, HeroData);
descriptor!(About, About, AboutData);
descriptor!(Blog, Blog, BlogData);
descriptor!(Products, Products, ProductsData);
descriptor!(Categories, Categories, CategoriesData);
descriptor!(Services, Services, ServicesData);
descriptor!(Faq, Faq, FaqData);
descriptor!(Pricing, Pricing, PricingData);
descriptor!(Testimonials, Testimonials, TestimonialsData);
descriptor!(Contact, Contact, ContactData);
descriptor!(Appointment, Appointment, AppointmentData);
descriptor!(OrderConfirmation, OrderConfirmation, OrderConfirmationData);
descriptor!(Youtube, Youtube, YoutubeData);
descriptor!(Footer, Footer, FooterData);
