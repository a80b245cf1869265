mod support;

use serde_json::Value;
use vinmatch_client::commands::describe::{self, DescribeOptions};
use vinmatch_client::commands::registry::{self, RegistryOptions};
use vinmatch_client::commands::table::{self, TableOptions};

use support::{ACME_REGISTRY, MASTER_CSV, workspace, write_file};

fn to_value(envelope: vinmatch_client::SuccessEnvelope) -> Value {
    let value = serde_json::to_value(envelope);
    assert!(value.is_ok());
    value.unwrap_or(Value::Null)
}

#[test]
fn describe_reports_every_extracted_part() {
    let temp = workspace("vinmatch-describe");
    assert!(temp.is_ok());
    if let Ok((dir, home)) = temp {
        let master = dir.path().join("master.csv");
        write_file(&master, MASTER_CSV);

        let result = describe::run_with_options(DescribeOptions {
            text: "Caymus Special Selection Cabernet 2016 magnum gift box".to_string(),
            master: master.display().to_string(),
            home_override: Some(&home),
            ..DescribeOptions::default()
        });
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            let value = to_value(envelope);
            let data = &value["data"];
            assert_eq!(data["matched"], Value::Bool(true));
            assert_eq!(data["category_status"], Value::from("matched"));
            assert_eq!(data["parts"]["winery"], Value::from("Caymus"));
            assert_eq!(data["parts"]["category"], Value::from("Cab"));
            assert_eq!(data["parts"]["phrases"][0], Value::from("SS"));
            assert_eq!(data["parts"]["vintage"], Value::from("2016"));
            assert_eq!(data["parts"]["size"], Value::from("1.5Ltr"));
            assert_eq!(data["parts"]["qualifier"], Value::from("Gift"));
            assert_eq!(data["parts"]["case_lot"], Value::Bool(false));
            assert_eq!(
                data["description"],
                Value::from("Caymus Cab SS 2016 1.5Ltr Gift")
            );
        }
    }
}

#[test]
fn describe_without_a_winery_is_not_an_error() {
    let temp = workspace("vinmatch-describe-miss");
    assert!(temp.is_ok());
    if let Ok((dir, home)) = temp {
        let master = dir.path().join("master.csv");
        write_file(&master, MASTER_CSV);

        let result = describe::run_with_options(DescribeOptions {
            text: "Mystery Cellars Merlot 2015".to_string(),
            master: master.display().to_string(),
            home_override: Some(&home),
            ..DescribeOptions::default()
        });
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            let value = to_value(envelope);
            assert_eq!(value["data"]["matched"], Value::Bool(false));
            assert!(value["data"].get("description").is_none());
        }
    }
}

#[test]
fn table_lists_phrase_sets_per_bucket() {
    let temp = workspace("vinmatch-table");
    assert!(temp.is_ok());
    if let Ok((dir, home)) = temp {
        let master = dir.path().join("master.csv");
        write_file(&master, MASTER_CSV);

        let result = table::run_with_options(TableOptions {
            master: master.display().to_string(),
            winery: Some("silver oak".to_string()),
            home_override: Some(&home),
            ..TableOptions::default()
        });
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            let value = to_value(envelope);
            let data = &value["data"];
            assert_eq!(data["winery_filter"], Value::from("Silver Oak"));
            let buckets = data["buckets"].as_array().cloned().unwrap_or_default();
            assert_eq!(buckets.len(), 1);
            assert_eq!(buckets[0]["category"], Value::from("Cab"));
            assert_eq!(
                buckets[0]["phrase_sets"],
                serde_json::json!([["Alex"], ["Napa"]])
            );
        }
    }
}

#[test]
fn table_rejects_unknown_winery_filter() {
    let temp = workspace("vinmatch-table-unknown");
    assert!(temp.is_ok());
    if let Ok((dir, home)) = temp {
        let master = dir.path().join("master.csv");
        write_file(&master, MASTER_CSV);

        let result = table::run_with_options(TableOptions {
            master: master.display().to_string(),
            winery: Some("Nobody".to_string()),
            home_override: Some(&home),
            ..TableOptions::default()
        });
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "invalid_argument");
        }
    }
}

#[test]
fn registry_reports_builtin_then_home_file() {
    let temp = workspace("vinmatch-registry");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let builtin = registry::run_with_options(RegistryOptions {
            registry: None,
            home_override: Some(&home),
        });
        assert!(builtin.is_ok());
        if let Ok(envelope) = builtin {
            let value = to_value(envelope);
            assert_eq!(value["data"]["source"]["kind"], Value::from("builtin"));
            assert_eq!(value["data"]["non_wine_marker"], Value::from("~"));
            let silver_oak = value["data"]["wineries"]
                .as_array()
                .and_then(|wineries| {
                    wineries
                        .iter()
                        .find(|winery| winery["name"] == Value::from("Silver Oak"))
                        .cloned()
                })
                .unwrap_or(Value::Null);
            assert_eq!(silver_oak["forced_tag"], Value::from("Alex"));
        }

        write_file(&home.join("registry.json"), ACME_REGISTRY);
        let from_home = registry::run_with_options(RegistryOptions {
            registry: None,
            home_override: Some(&home),
        });
        assert!(from_home.is_ok());
        if let Ok(envelope) = from_home {
            let value = to_value(envelope);
            assert_eq!(value["data"]["source"]["kind"], Value::from("home"));
            assert_eq!(value["data"]["counts"]["wineries"], Value::from(1));
        }
    }
}
