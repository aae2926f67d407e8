//! Site adapters for coupon listing sources
//!
//! Each supported site implements the [`SiteAdapter`] trait: discover
//! candidate items from paginated listings, and resolve a candidate's detail
//! page to the final outbound course link. Adapters never let a rendering or
//! parsing failure escape; a bad page degrades to an empty listing or a
//! `None` resolution and the pipeline moves on.

mod coupon_scorpion;
mod coursevania;
mod extract;
mod online_courses;
mod real_discount;

pub use coupon_scorpion::CouponScorpionAdapter;
pub use coursevania::CoursevaniaAdapter;
pub use extract::{repair_image_url, PLACEHOLDER_IMAGE};
pub use online_courses::OnlineCoursesAdapter;
pub use real_discount::RealDiscountAdapter;

use crate::render::PageRenderer;
use async_trait::async_trait;
use url::Url;

/// Identifies a coupon listing source, one variant per adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    CouponScorpion,
    RealDiscount,
    OnlineCourses,
    Coursevania,
}

impl Source {
    /// All known sources, in registry order
    pub const ALL: [Source; 4] = [
        Source::CouponScorpion,
        Source::RealDiscount,
        Source::OnlineCourses,
        Source::Coursevania,
    ];

    /// Stable tag used in config files and the database
    pub fn tag(&self) -> &'static str {
        match self {
            Self::CouponScorpion => "couponscorpion",
            Self::RealDiscount => "real_discount",
            Self::OnlineCourses => "onlinecourses",
            Self::Coursevania => "coursevania",
        }
    }

    /// Parses a tag back into a source
    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "couponscorpion" => Some(Self::CouponScorpion),
            "real_discount" => Some(Self::RealDiscount),
            "onlinecourses" => Some(Self::OnlineCourses),
            "coursevania" => Some(Self::Coursevania),
            _ => None,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// An unresolved listing entry awaiting dedup and link resolution
///
/// Candidate items are ephemeral: produced by a listing pass, consumed
/// immediately by the orchestrator, never persisted.
#[derive(Debug, Clone)]
pub struct CandidateItem {
    pub title: String,
    pub detail_link: Url,
    pub image: Option<Url>,
    pub source: Source,
}

/// Per-site scraping contract
///
/// Implementations are selected from the registry by source tag rather than
/// by conditional branching in the orchestrator.
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    /// The source this adapter scrapes
    fn source(&self) -> Source;

    /// Walks listing pages 1..=`pages` and returns every extractable item
    ///
    /// A page that fails to render or yields nothing is logged and skipped;
    /// remaining pages are still visited. Only items with a non-empty title
    /// and detail link are returned.
    async fn list_candidates(&self, renderer: &dyn PageRenderer, pages: u32) -> Vec<CandidateItem>;

    /// Renders the detail page and extracts the outbound course link
    ///
    /// Selector rules are tried in order, most specific call-to-action
    /// first, so an incidental partner-site mention never wins over the
    /// primary button. Returns `None` when the page fails to render or no
    /// rule matches.
    async fn resolve_target(&self, renderer: &dyn PageRenderer, detail_link: &Url) -> Option<Url>;
}

/// Creates the adapter registered for a source
pub fn adapter_for(source: Source) -> Box<dyn SiteAdapter> {
    match source {
        Source::CouponScorpion => Box::new(CouponScorpionAdapter),
        Source::RealDiscount => Box::new(RealDiscountAdapter),
        Source::OnlineCourses => Box::new(OnlineCoursesAdapter),
        Source::Coursevania => Box::new(CoursevaniaAdapter),
    }
}
