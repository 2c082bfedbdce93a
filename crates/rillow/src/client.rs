//! Web service client

use tracing::{debug, instrument};
use url::Url;

use crate::config::ClientConfig;
use crate::document::Document;
use crate::error::Result;
use crate::query::{
    ChartOptions, DemographicsOptions, MonthlyPaymentOptions, Query, RegionChartOptions,
    RegionChildrenOptions, UnitType,
};
use crate::transport::{redact, HttpTransport, Transport};

/// Client for the valuation web service.
///
/// Every call builds the request URL, performs a single GET through the
/// transport and returns the parsed response. Any failure aborts the call;
/// there are no partial results and no retries.
///
/// ```no_run
/// # fn main() -> rillow::Result<()> {
/// let rillow = rillow::Rillow::new("your-zws-id")?;
/// let result = rillow.get_search_results("2114 Bigelow Ave", "Seattle, WA")?;
/// println!("{:?}", result.find_attribute("valuationRange"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Rillow<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl Rillow<HttpTransport> {
    /// Client for the public endpoint using the given web service id
    pub fn new(zws_id: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(zws_id)?)
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.user_agent())?;
        Ok(Self { config, transport })
    }

    /// Client configured from `RILLOW_ZWSID` and `RILLOW_BASE_URL`
    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }
}

impl<T: Transport> Rillow<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Property (or closely matching properties) for an address
    pub fn get_search_results(&self, address: &str, citystatezip: &str) -> Result<Document> {
        self.execute(&Query::SearchResults {
            address: address.to_string(),
            citystatezip: citystatezip.to_string(),
        })
    }

    /// Search results with lot size, year built, rooms and last sale
    pub fn get_deep_search_results(&self, address: &str, citystatezip: &str) -> Result<Document> {
        self.execute(&Query::DeepSearchResults {
            address: address.to_string(),
            citystatezip: citystatezip.to_string(),
        })
    }

    /// Current Zestimate, valuation range and location of a property
    pub fn get_zestimate(&self, zpid: &str) -> Result<Document> {
        self.execute(&Query::Zestimate {
            zpid: zpid.to_string(),
        })
    }

    /// URL of a historical value chart for a property
    pub fn get_chart(
        &self,
        zpid: &str,
        unit_type: UnitType,
        options: ChartOptions,
    ) -> Result<Document> {
        self.execute(&Query::Chart {
            zpid: zpid.to_string(),
            unit_type,
            options,
        })
    }

    /// URL of a historical value chart for a region
    pub fn get_region_chart(
        &self,
        unit_type: UnitType,
        options: RegionChartOptions,
    ) -> Result<Document> {
        self.execute(&Query::RegionChart { unit_type, options })
    }

    pub fn get_demographics(&self, options: DemographicsOptions) -> Result<Document> {
        self.execute(&Query::Demographics(options))
    }

    /// Subregions of a region
    pub fn get_region_children(&self, options: RegionChildrenOptions) -> Result<Document> {
        self.execute(&Query::RegionChildren(options))
    }

    /// Recent comparable sales for a property
    pub fn get_comps(&self, zpid: &str, count: u32) -> Result<Document> {
        self.execute(&Query::Comps {
            zpid: zpid.to_string(),
            count,
        })
    }

    /// Comparable sales with full property data
    pub fn get_deep_comps(&self, zpid: &str, count: u32) -> Result<Document> {
        self.execute(&Query::DeepComps {
            zpid: zpid.to_string(),
            count,
        })
    }

    /// Estimated monthly mortgage payments for a price
    pub fn get_monthly_payments(
        &self,
        price: u64,
        options: MonthlyPaymentOptions,
    ) -> Result<Document> {
        self.execute(&Query::MonthlyPayments { price, options })
    }

    /// Current mortgage rates
    pub fn get_rate_summary(&self) -> Result<Document> {
        self.execute(&Query::RateSummary)
    }

    /// Request URL a query would be sent to
    pub fn url_for(&self, query: &Query) -> Result<Url> {
        query.url(self.config.base_url(), self.config.zws_id())
    }

    /// Run any query: build URL, fetch, parse
    #[instrument(skip(self, query), fields(endpoint = query.endpoint()))]
    pub fn execute(&self, query: &Query) -> Result<Document> {
        let url = self.url_for(query)?;
        debug!(url = %redact(&url), "fetching");
        let body = self.transport.fetch(&url)?;
        self.parse_response(&body)
    }

    /// Parse a response body with this client's response settings
    pub fn parse_response(&self, body: &str) -> Result<Document> {
        Ok(crate::from_xml_str_with_config(body, self.config.response())?)
    }
}
