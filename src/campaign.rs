use tracing::info;

use crate::backend::{Backend, CampaignRequest};
use crate::error::{Error, Result};
use crate::venue::Venue;

/// Budget typed on the campaign screen, in yen.
pub fn parse_budget(input: &str) -> Result<u64> {
    let budget: u64 = input
        .trim()
        .parse()
        .map_err(|_| Error::validation(format!("budget {input:?} is not a whole number")))?;
    if budget == 0 {
        return Err(Error::validation("budget must be greater than zero"));
    }
    Ok(budget)
}

pub fn build_request(venue: &Venue, trend: &str, budget: u64) -> Result<CampaignRequest> {
    if trend.trim().is_empty() {
        return Err(Error::validation("pick a trend for the campaign"));
    }
    if budget == 0 {
        return Err(Error::validation("budget must be greater than zero"));
    }
    Ok(CampaignRequest {
        venueid: venue.id.clone(),
        tags: venue.tags.clone(),
        trend: trend.to_string(),
        budget,
    })
}

pub fn submit(backend: &dyn Backend, req: &CampaignRequest) -> Result<()> {
    info!(venue = %req.venueid, trend = %req.trend, budget = req.budget, "generating campaign");
    backend.generate_campaign(req)
}
