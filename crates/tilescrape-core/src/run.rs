//! Operator input for a single scrape run.
//!
//! A run is triggered by a [`TriggerInput`], either assembled from CLI flags
//! or loaded from a YAML job file, and validated into an immutable
//! [`RunConfiguration`] before any browser work starts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, CoreError, ProductType, TypeAllowList};

const DEFAULT_SCROLL_PASSES: u32 = 10;
const DEFAULT_SCROLL_DELAY_MS: u64 = 1500;
const DEFAULT_STABLE_PASSES: u32 = 2;

/// Raw trigger message, shaped like the operator form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerInput {
    pub base_url: String,
    #[serde(default = "default_page")]
    pub start_page: u32,
    #[serde(default = "default_page")]
    pub end_page: u32,
    #[serde(default)]
    pub infinite_mode: bool,
    #[serde(default = "default_scroll_passes")]
    pub scroll_passes: u32,
    /// Delay between scroll passes, in milliseconds.
    #[serde(default = "default_scroll_delay")]
    pub scroll_delay: u64,
    #[serde(default)]
    pub selected_types: Vec<ProductType>,
    /// Keep scrolling until the tile count stops growing, with
    /// `scroll_passes` as the upper bound.
    #[serde(default)]
    pub until_stable: bool,
    #[serde(default = "default_stable_passes")]
    pub stable_passes: u32,
}

fn default_page() -> u32 {
    1
}

fn default_scroll_passes() -> u32 {
    DEFAULT_SCROLL_PASSES
}

fn default_scroll_delay() -> u64 {
    DEFAULT_SCROLL_DELAY_MS
}

fn default_stable_passes() -> u32 {
    DEFAULT_STABLE_PASSES
}

impl TriggerInput {
    /// Validates the trigger and builds the run configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRun`] when the base URL is empty or not an
    /// absolute http(s) URL, when a paged range is empty or starts below 1, or
    /// when an infinite-scroll run asks for zero scroll passes.
    pub fn into_run_configuration(self) -> Result<RunConfiguration, CoreError> {
        let base_url = self.base_url.trim().to_string();
        validate_base_url(&base_url)?;

        let mode = if self.infinite_mode {
            if self.scroll_passes == 0 {
                return Err(CoreError::InvalidRun(
                    "infinite-scroll mode needs at least one scroll pass".to_string(),
                ));
            }
            let policy = if self.until_stable {
                ScrollPolicy::UntilStable {
                    max_passes: self.scroll_passes,
                    delay_ms: self.scroll_delay,
                    stable_passes: self.stable_passes.max(1),
                }
            } else {
                ScrollPolicy::FixedPasses {
                    passes: self.scroll_passes,
                    delay_ms: self.scroll_delay,
                }
            };
            ListingMode::InfiniteScroll { policy }
        } else {
            if self.start_page < 1 {
                return Err(CoreError::InvalidRun(
                    "start page must be at least 1".to_string(),
                ));
            }
            if self.end_page < self.start_page {
                return Err(CoreError::InvalidRun(format!(
                    "end page {} is before start page {}",
                    self.end_page, self.start_page
                )));
            }
            ListingMode::Paged {
                start_page: self.start_page,
                end_page: self.end_page,
            }
        };

        Ok(RunConfiguration {
            base_url,
            mode,
            allow_list: self.selected_types.into_iter().collect(),
        })
    }
}

fn validate_base_url(base_url: &str) -> Result<(), CoreError> {
    if base_url.is_empty() {
        return Err(CoreError::InvalidRun("base URL must be non-empty".to_string()));
    }
    let parsed = url::Url::parse(base_url)
        .map_err(|e| CoreError::InvalidRun(format!("base URL \"{base_url}\" is invalid: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CoreError::InvalidRun(format!(
            "base URL \"{base_url}\" must use http or https"
        )));
    }
    Ok(())
}

/// How the listing is traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingMode {
    /// Visit `start_page..=end_page` by URL, extracting once per page.
    Paged { start_page: u32, end_page: u32 },
    /// Scroll a single page according to `policy`, then extract once.
    InfiniteScroll { policy: ScrollPolicy },
}

/// Scroll schedule for infinite-scroll listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPolicy {
    /// Scroll exactly `passes` times, pausing `delay_ms` after each.
    FixedPasses { passes: u32, delay_ms: u64 },
    /// Scroll until the tile count has not grown for `stable_passes`
    /// consecutive passes, or `max_passes` is reached.
    UntilStable {
        max_passes: u32,
        delay_ms: u64,
        stable_passes: u32,
    },
}

/// Validated, immutable input for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    pub base_url: String,
    pub mode: ListingMode,
    pub allow_list: TypeAllowList,
}

impl RunConfiguration {
    /// Number of extraction steps the run will perform. An inverted page
    /// range plans none.
    #[must_use]
    pub fn planned_extractions(&self) -> u32 {
        match self.mode {
            ListingMode::Paged {
                start_page,
                end_page,
            } if end_page >= start_page => (end_page - start_page).saturating_add(1),
            ListingMode::Paged { .. } => 0,
            ListingMode::InfiniteScroll { .. } => 1,
        }
    }
}

/// Load a trigger from a YAML job file and validate it.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_job(path: &Path) -> Result<RunConfiguration, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::JobFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let trigger: TriggerInput = serde_yaml::from_str(&content)?;
    Ok(trigger.into_run_configuration()?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn paged(start_page: u32, end_page: u32) -> TriggerInput {
        TriggerInput {
            base_url: "https://www.amazon.com/s?k=cat+shirt".to_string(),
            start_page,
            end_page,
            infinite_mode: false,
            scroll_passes: 0,
            scroll_delay: 0,
            selected_types: vec![],
            until_stable: false,
            stable_passes: 2,
        }
    }

    #[test]
    fn paged_trigger_builds_page_range() {
        let run = paged(2, 5).into_run_configuration().unwrap();
        assert_eq!(
            run.mode,
            ListingMode::Paged {
                start_page: 2,
                end_page: 5
            }
        );
        assert_eq!(run.planned_extractions(), 4);
        assert!(run.allow_list.is_unrestricted());
    }

    #[test]
    fn inverted_range_plans_no_extractions() {
        let run = RunConfiguration {
            base_url: "https://www.amazon.com/s?k=cat+shirt".to_string(),
            mode: ListingMode::Paged {
                start_page: 3,
                end_page: 1,
            },
            allow_list: TypeAllowList::unrestricted(),
        };
        assert_eq!(run.planned_extractions(), 0);
    }

    #[test]
    fn full_u32_range_saturates() {
        let run = RunConfiguration {
            base_url: "https://www.amazon.com/s?k=cat+shirt".to_string(),
            mode: ListingMode::Paged {
                start_page: 0,
                end_page: u32::MAX,
            },
            allow_list: TypeAllowList::unrestricted(),
        };
        assert_eq!(run.planned_extractions(), u32::MAX);
    }

    #[test]
    fn rejects_empty_base_url() {
        let mut trigger = paged(1, 1);
        trigger.base_url = "   ".to_string();
        let err = trigger.into_run_configuration().unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut trigger = paged(1, 1);
        trigger.base_url = "ftp://example.com/list".to_string();
        let err = trigger.into_run_configuration().unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn rejects_relative_base_url() {
        let mut trigger = paged(1, 1);
        trigger.base_url = "/s?k=shirt".to_string();
        assert!(trigger.into_run_configuration().is_err());
    }

    #[test]
    fn rejects_start_page_zero() {
        let err = paged(0, 3).into_run_configuration().unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn rejects_end_before_start() {
        let err = paged(4, 3).into_run_configuration().unwrap_err();
        assert!(err.to_string().contains("before start page"));
    }

    #[test]
    fn infinite_mode_ignores_page_range() {
        let mut trigger = paged(0, 0);
        trigger.infinite_mode = true;
        trigger.scroll_passes = 8;
        trigger.scroll_delay = 250;
        let run = trigger.into_run_configuration().unwrap();
        assert_eq!(
            run.mode,
            ListingMode::InfiniteScroll {
                policy: ScrollPolicy::FixedPasses {
                    passes: 8,
                    delay_ms: 250
                }
            }
        );
        assert_eq!(run.planned_extractions(), 1);
    }

    #[test]
    fn infinite_mode_requires_a_scroll_pass() {
        let mut trigger = paged(1, 1);
        trigger.infinite_mode = true;
        assert!(trigger.into_run_configuration().is_err());
    }

    #[test]
    fn until_stable_uses_scroll_passes_as_cap() {
        let mut trigger = paged(1, 1);
        trigger.infinite_mode = true;
        trigger.scroll_passes = 30;
        trigger.scroll_delay = 100;
        trigger.until_stable = true;
        trigger.stable_passes = 0;
        let run = trigger.into_run_configuration().unwrap();
        assert_eq!(
            run.mode,
            ListingMode::InfiniteScroll {
                policy: ScrollPolicy::UntilStable {
                    max_passes: 30,
                    delay_ms: 100,
                    stable_passes: 1
                }
            }
        );
    }

    #[test]
    fn trigger_deserializes_from_camel_case_message() {
        let trigger: TriggerInput = serde_json::from_value(serde_json::json!({
            "baseUrl": "https://www.amazon.com/s?k=dog",
            "startPage": 1,
            "endPage": 3,
            "infiniteMode": false,
            "scrollPasses": 5,
            "scrollDelay": 800,
            "selectedTypes": ["hoodie", "ziphoodie"]
        }))
        .unwrap();
        let run = trigger.into_run_configuration().unwrap();
        assert!(run.allow_list.permits(ProductType::ZipHoodie));
        assert!(!run.allow_list.permits(ProductType::Shirt));
    }

    #[test]
    fn load_job_reads_yaml_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "baseUrl: https://www.amazon.com/s?k=cat\nendPage: 2").unwrap();
        let run = load_job(file.path()).unwrap();
        assert_eq!(
            run.mode,
            ListingMode::Paged {
                start_page: 1,
                end_page: 2
            }
        );
    }

    #[test]
    fn load_job_reports_missing_file() {
        let err = load_job(Path::new("/nonexistent/job.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::JobFileIo { .. }));
    }

    #[test]
    fn load_job_rejects_unknown_type() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "baseUrl: https://www.amazon.com/s?k=cat\nselectedTypes: [poncho]"
        )
        .unwrap();
        let err = load_job(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::JobFileParse(_)));
    }

    #[test]
    fn load_job_surfaces_validation_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "baseUrl: https://www.amazon.com/s?k=cat\nstartPage: 3\nendPage: 1"
        )
        .unwrap();
        let err = load_job(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJob(CoreError::InvalidRun(_))));
    }
}
