mod support;

use chrono::NaiveDate;
use finsight::config::MarketConfig;
use finsight::market::{read_gold_prices, FundPredictionTable, FundTable, MarketData};
use support::temp_dir;

const FUNDS: &str = "Scheme Code,date,nav\n\
                     100027,01-01-2024,10.5\n\
                     100033,01-01-2024,22.0\n\
                     100027,02-01-2024,10.7\n\
                     100027,03-01-2024,\n\
                     100041,01-01-2024,N.A.\n";

const PREDICTIONS: &str = "Scheme Code,date,predicted_nav\n\
                           100027,04-01-2024,10.9\n\
                           100033,04-01-2024,\n";

fn market_config(base: &std::path::Path) -> MarketConfig {
    MarketConfig {
        base_dir: base.to_path_buf(),
        ..MarketConfig::default()
    }
}

#[test]
fn fund_table_keeps_rows_with_missing_or_unparsable_navs() {
    let table = FundTable::from_reader(FUNDS.as_bytes()).unwrap();
    assert_eq!(table.schemes(), vec!["100027", "100033", "100041"]);
    assert!(table.contains("100041"));
    assert!(!table.contains("999"));

    let history = table.history("100027");
    assert_eq!(history.len(), 3);
    assert_eq!(history[1].date, "02-01-2024");
    assert_eq!(history[1].nav, Some(10.7));
    assert_eq!(history[2].nav, None);
    assert_eq!(table.history("100041")[0].nav, None);

    let predictions = FundPredictionTable::from_reader(PREDICTIONS.as_bytes()).unwrap();
    assert_eq!(predictions.for_scheme("100027")[0].predicted_nav, Some(10.9));
    assert_eq!(predictions.for_scheme("100033")[0].predicted_nav, None);
}

#[test]
fn gold_prices_parse_dates_and_zero_bad_prices() {
    let csv = "Date,price\n01-03-2024,6200.5\n02-03-2024,n/a\n";
    let points = read_gold_prices(csv.as_bytes()).unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert_eq!(points[0].price, 6200.5);
    assert_eq!(points[1].price, 0.0);

    assert!(read_gold_prices("Day,price\n01-03-2024,1\n".as_bytes()).is_err());
    assert!(read_gold_prices("Date,price\n2024-03-01,1\n".as_bytes()).is_err());
}

#[test]
fn market_data_joins_history_with_predictions() {
    let base = temp_dir("market-funds");
    let cfg = market_config(&base);
    std::fs::write(cfg.path(&cfg.funds_file), FUNDS).unwrap();
    std::fs::write(cfg.path(&cfg.fund_predictions_file), PREDICTIONS).unwrap();
    let market = MarketData::new(cfg);

    assert_eq!(
        market.fund_schemes().unwrap(),
        vec!["100027", "100033", "100041"]
    );
    let data = market.fund_data("100027").unwrap().unwrap();
    assert_eq!(data.historical.len(), 3);
    assert_eq!(data.predictions[0].predicted_nav, Some(10.9));
    assert!(market.fund_data("999").unwrap().is_none());

    let _ = std::fs::remove_dir_all(&base);
}

#[test]
fn missing_optional_market_files_degrade_to_empty() {
    let base = temp_dir("market-empty");
    let cfg = market_config(&base);
    std::fs::write(cfg.path(&cfg.funds_file), FUNDS).unwrap();
    let market = MarketData::new(cfg);

    let data = market.fund_data("100033").unwrap().unwrap();
    assert_eq!(data.historical.len(), 1);
    assert!(data.predictions.is_empty());

    let gold = market.gold_prices();
    assert!(gold.historical.is_empty());
    assert!(gold.predicted.is_empty());

    let _ = std::fs::remove_dir_all(&base);
}

#[test]
fn missing_fund_table_is_an_error() {
    let base = temp_dir("market-nofunds");
    let market = MarketData::new(market_config(&base));
    assert!(market.fund_schemes().is_err());
    assert!(market.fund_data("100027").is_err());
    let _ = std::fs::remove_dir_all(&base);
}
