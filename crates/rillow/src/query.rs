//! Web service operations and their parameters
//!
//! Every call is a [`Query`]: the endpoint plus its required parameters and
//! an options struct. Options are checked once, when the request URL is
//! built, so an out-of-range value never reaches the network.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{ConfigError, OptionError, Result};

/// Chart width bounds accepted by the chart endpoints
pub const CHART_WIDTH: (u32, u32) = (200, 600);
/// Chart height bounds accepted by the chart endpoints
pub const CHART_HEIGHT: (u32, u32) = (100, 300);
/// Number of comparables the comps endpoints return at most
pub const COMPS_COUNT: (u32, u32) = (1, 25);

/// Whether charts plot percent or dollar change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitType {
    Percent,
    Dollar,
}

impl UnitType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percent => "percent",
            Self::Dollar => "dollar",
        }
    }
}

/// How far back chart data goes; the service assumes one year when omitted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartDuration {
    OneYear,
    FiveYears,
    TenYears,
}

impl ChartDuration {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneYear => "1year",
            Self::FiveYears => "5years",
            Self::TenYears => "10years",
        }
    }
}

/// Subregion level requested from the region hierarchy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChildType {
    State,
    County,
    City,
    Zipcode,
    Neighborhood,
}

impl ChildType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::County => "county",
            Self::City => "city",
            Self::Zipcode => "zipcode",
            Self::Neighborhood => "neighborhood",
        }
    }
}

macro_rules! str_enum {
    ($ty:ty, $name:literal, [$($variant:ident),+]) => {
        impl FromStr for $ty {
            type Err = OptionError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case(Self::$variant.as_str()) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(OptionError::Unknown {
                    name: $name,
                    value: s.to_string(),
                })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(UnitType, "unit type", [Percent, Dollar]);
str_enum!(ChartDuration, "chart duration", [OneYear, FiveYears, TenYears]);
str_enum!(ChildType, "child type", [State, County, City, Zipcode, Neighborhood]);

/// Image size and time span of a value chart
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChartOptions {
    /// 200 to 600 pixels
    pub width: Option<u32>,
    /// 100 to 300 pixels
    pub height: Option<u32>,
    pub duration: Option<ChartDuration>,
}

/// Region and chart settings of a region chart
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionChartOptions {
    pub city: Option<String>,
    /// Two-letter state abbreviation
    pub state: Option<String>,
    /// Five-digit ZIP code
    pub zip: Option<String>,
    pub chart: ChartOptions,
}

/// Region selector for demographics; either a region id or state and city
/// (plus an optional neighborhood)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DemographicsOptions {
    pub rid: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub neighborhood: Option<String>,
}

/// Region whose subregions are listed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionChildrenOptions {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub rid: Option<String>,
    /// Defaults server side to the next level down
    pub childtype: Option<ChildType>,
}

/// Down payment and location for a payment estimate
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonthlyPaymentOptions {
    /// Percent of the price; the service assumes 20 when omitted
    pub down: Option<u32>,
    /// Down payment in dollars
    pub dollars_down: Option<u64>,
    /// Used for tax and insurance estimates
    pub zip: Option<String>,
}

/// A single web service call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Query {
    SearchResults {
        address: String,
        citystatezip: String,
    },
    DeepSearchResults {
        address: String,
        citystatezip: String,
    },
    Zestimate {
        zpid: String,
    },
    Chart {
        zpid: String,
        unit_type: UnitType,
        options: ChartOptions,
    },
    RegionChart {
        unit_type: UnitType,
        options: RegionChartOptions,
    },
    Demographics(DemographicsOptions),
    RegionChildren(RegionChildrenOptions),
    Comps {
        zpid: String,
        count: u32,
    },
    DeepComps {
        zpid: String,
        count: u32,
    },
    MonthlyPayments {
        price: u64,
        options: MonthlyPaymentOptions,
    },
    RateSummary,
}

impl Query {
    /// Path of the endpoint, relative to the service base URL
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Self::SearchResults { .. } => "GetSearchResults.htm",
            Self::DeepSearchResults { .. } => "GetDeepSearchResults.htm",
            Self::Zestimate { .. } => "GetZestimate.htm",
            Self::Chart { .. } => "GetChart.htm",
            Self::RegionChart { .. } => "GetRegionChart.htm",
            Self::Demographics(_) => "GetDemographics.htm",
            Self::RegionChildren(_) => "GetRegionChildren.htm",
            Self::Comps { .. } => "GetComps.htm",
            Self::DeepComps { .. } => "GetDeepComps.htm",
            Self::MonthlyPayments { .. } => "GetMonthlyPayments.htm",
            Self::RateSummary => "GetRateSummary.htm",
        }
    }

    /// Validated query parameters in request order, without the service id
    pub fn params(&self) -> std::result::Result<Vec<(&'static str, String)>, OptionError> {
        let mut params = Params::default();
        match self {
            Self::SearchResults {
                address,
                citystatezip,
            }
            | Self::DeepSearchResults {
                address,
                citystatezip,
            } => {
                params.required("address", address)?;
                params.required("citystatezip", citystatezip)?;
            }
            Self::Zestimate { zpid } => params.required("zpid", zpid)?,
            Self::Chart {
                zpid,
                unit_type,
                options,
            } => {
                params.required("zpid", zpid)?;
                params.push("unit-type", unit_type.as_str());
                params.chart(options)?;
            }
            Self::RegionChart { unit_type, options } => {
                params.push("unit-type", unit_type.as_str());
                params.optional("city", options.city.as_deref());
                params.optional("state", options.state.as_deref());
                params.optional("ZIP", options.zip.as_deref());
                params.chart(&options.chart)?;
            }
            Self::Demographics(options) => {
                params.optional("city", options.city.as_deref());
                params.optional("state", options.state.as_deref());
                params.optional("rid", options.rid.as_deref());
                params.optional("neighborhood", options.neighborhood.as_deref());
            }
            Self::RegionChildren(options) => {
                params.optional("city", options.city.as_deref());
                params.optional("state", options.state.as_deref());
                params.optional("country", options.country.as_deref());
                params.optional("rid", options.rid.as_deref());
                params.optional("childtype", options.childtype.map(ChildType::as_str));
            }
            Self::Comps { zpid, count } | Self::DeepComps { zpid, count } => {
                params.required("zpid", zpid)?;
                params.push("count", in_range("count", *count, COMPS_COUNT)?);
            }
            Self::MonthlyPayments { price, options } => {
                params.push("price", price);
                if let Some(down) = options.down {
                    params.push("down", in_range("down", down, (0, 100))?);
                }
                params.optional("dollarsdown", options.dollars_down);
                params.optional("zip", options.zip.as_deref());
            }
            Self::RateSummary => {}
        }
        Ok(params.0)
    }

    /// Full request URL for this query
    pub fn url(&self, base: &Url, zws_id: &str) -> Result<Url> {
        let params = self.params()?;
        let mut url = base
            .join(self.endpoint())
            .map_err(|source| ConfigError::InvalidBaseUrl {
                url: base.to_string(),
                source,
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            pairs.append_pair("zws-id", zws_id);
            for (name, value) in &params {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }
}

#[derive(Default)]
struct Params(Vec<(&'static str, String)>);

impl Params {
    fn push(&mut self, name: &'static str, value: impl ToString) {
        self.0.push((name, value.to_string()));
    }

    fn optional(&mut self, name: &'static str, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.push(name, value);
        }
    }

    fn required(&mut self, name: &'static str, value: &str) -> std::result::Result<(), OptionError> {
        if value.trim().is_empty() {
            return Err(OptionError::Empty { name });
        }
        self.push(name, value);
        Ok(())
    }

    fn chart(&mut self, options: &ChartOptions) -> std::result::Result<(), OptionError> {
        if let Some(width) = options.width {
            self.push("width", in_range("width", width, CHART_WIDTH)?);
        }
        if let Some(height) = options.height {
            self.push("height", in_range("height", height, CHART_HEIGHT)?);
        }
        self.optional("chartDuration", options.duration.map(ChartDuration::as_str));
        Ok(())
    }
}

fn in_range(
    name: &'static str,
    value: u32,
    (min, max): (u32, u32),
) -> std::result::Result<u32, OptionError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(OptionError::OutOfRange {
            name,
            min,
            max,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const BASE: &str = "http://www.zillow.com/webservice/";

    fn url_of(query: &Query) -> Result<String> {
        let base = Url::parse(BASE).map_err(|source| ConfigError::InvalidBaseUrl {
            url: BASE.to_string(),
            source,
        })?;
        Ok(query.url(&base, "X1-test")?.to_string())
    }

    #[test]
    fn test_search_results_url_is_encoded() -> Result<()> {
        let query = Query::SearchResults {
            address: "2114 Bigelow Ave".to_string(),
            citystatezip: "Seattle, WA".to_string(),
        };
        assert_eq!(
            url_of(&query)?,
            "http://www.zillow.com/webservice/GetSearchResults.htm?zws-id=X1-test&address=2114+Bigelow+Ave&citystatezip=Seattle%2C+WA"
        );
        Ok(())
    }

    #[test]
    fn test_chart_url_carries_only_given_options() -> Result<()> {
        let query = Query::Chart {
            zpid: "48749425".to_string(),
            unit_type: UnitType::Percent,
            options: ChartOptions {
                width: Some(300),
                height: None,
                duration: Some(ChartDuration::FiveYears),
            },
        };
        assert_eq!(
            url_of(&query)?,
            "http://www.zillow.com/webservice/GetChart.htm?zws-id=X1-test&zpid=48749425&unit-type=percent&width=300&chartDuration=5years"
        );
        Ok(())
    }

    #[test]
    fn test_region_chart_uses_upper_case_zip() -> Result<()> {
        let query = Query::RegionChart {
            unit_type: UnitType::Dollar,
            options: RegionChartOptions {
                zip: Some("98109".to_string()),
                ..RegionChartOptions::default()
            },
        };
        let params = query.params()?;
        assert_eq!(
            params,
            vec![("unit-type", "dollar".to_string()), ("ZIP", "98109".to_string())]
        );
        Ok(())
    }

    #[test]
    fn test_chart_width_out_of_range() {
        let query = Query::Chart {
            zpid: "1".to_string(),
            unit_type: UnitType::Dollar,
            options: ChartOptions {
                width: Some(700),
                ..ChartOptions::default()
            },
        };
        assert_eq!(
            query.params(),
            Err(OptionError::OutOfRange {
                name: "width",
                min: 200,
                max: 600,
                value: 700
            })
        );
    }

    #[test]
    fn test_chart_height_bounds_are_inclusive() {
        for height in [100, 300] {
            let query = Query::Chart {
                zpid: "1".to_string(),
                unit_type: UnitType::Dollar,
                options: ChartOptions {
                    height: Some(height),
                    ..ChartOptions::default()
                },
            };
            assert!(query.params().is_ok());
        }
    }

    #[test]
    fn test_empty_required_parameter() {
        let query = Query::Zestimate {
            zpid: "  ".to_string(),
        };
        assert!(matches!(
            url_of(&query),
            Err(Error::InvalidOption(OptionError::Empty { name: "zpid" }))
        ));
    }

    #[test]
    fn test_region_children_order() -> Result<()> {
        let query = Query::RegionChildren(RegionChildrenOptions {
            city: Some("seattle".to_string()),
            state: Some("WA".to_string()),
            country: Some("united states".to_string()),
            rid: None,
            childtype: Some(ChildType::Neighborhood),
        });
        let names: Vec<_> = query.params()?.into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["city", "state", "country", "childtype"]);
        Ok(())
    }

    #[test]
    fn test_comps_count_range() {
        let ok = Query::Comps {
            zpid: "48749425".to_string(),
            count: 5,
        };
        let too_many = Query::DeepComps {
            zpid: "48749425".to_string(),
            count: 26,
        };
        assert!(ok.params().is_ok());
        assert!(matches!(
            too_many.params(),
            Err(OptionError::OutOfRange { name: "count", .. })
        ));
    }

    #[test]
    fn test_monthly_payments() -> Result<()> {
        let query = Query::MonthlyPayments {
            price: 350_000,
            options: MonthlyPaymentOptions {
                down: Some(15),
                dollars_down: None,
                zip: Some("33432".to_string()),
            },
        };
        assert_eq!(
            url_of(&query)?,
            "http://www.zillow.com/webservice/GetMonthlyPayments.htm?zws-id=X1-test&price=350000&down=15&zip=33432"
        );
        Ok(())
    }

    #[test]
    fn test_rate_summary_has_only_service_id() -> Result<()> {
        assert_eq!(
            url_of(&Query::RateSummary)?,
            "http://www.zillow.com/webservice/GetRateSummary.htm?zws-id=X1-test"
        );
        Ok(())
    }

    #[test]
    fn test_enum_from_str() {
        assert_eq!("percent".parse(), Ok(UnitType::Percent));
        assert_eq!("5YEARS".parse(), Ok(ChartDuration::FiveYears));
        assert_eq!("zipcode".parse(), Ok(ChildType::Zipcode));
        assert_eq!(
            "acre".parse::<UnitType>(),
            Err(OptionError::Unknown {
                name: "unit type",
                value: "acre".to_string()
            })
        );
        assert_eq!(ChildType::Neighborhood.to_string(), "neighborhood");
    }
}
