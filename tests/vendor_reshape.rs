use finmetrics::data::{excel_serial_to_date, CsvConnector, VendorReshaper};
use finmetrics::FinmetricsError;
use polars::df;
use std::io::Write;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn well_formed_two_block_export_yields_all_blocks() -> anyhow::Result<()> {
    init_logging();
    let raw = df! {
        "c0" => &[Some("CL1 Comdty"), Some("Date"), Some("01/07/2019"), Some("02/07/2019"), Some("03/07/2019")],
        "c1" => &[None, Some("PX_LAST"), Some("58.1"), Some("59.3"), Some("58.8")],
        "c2" => &[Some("CO1 Comdty"), Some("Date"), Some("01/07/2019"), Some("02/07/2019"), Some("03/07/2019")],
        "c3" => &[None, Some("PX_LAST"), Some("64.5"), Some("65.0"), Some("64.2")],
    }?;

    let out = VendorReshaper::reshape(&raw)?;

    // Two blocks, three data rows each.
    assert_eq!(out.height(), 6);
    let names: Vec<_> = out
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(
        names,
        vec!["product".to_string(), "date".to_string(), "price".to_string()]
    );

    let products = out.column("product")?;
    let products = products.str()?;
    for i in 0..3 {
        assert_eq!(products.get(i), Some("CL1 Comdty"));
        assert_eq!(products.get(i + 3), Some("CO1 Comdty"));
    }
    Ok(())
}

#[test]
fn unexpected_price_label_fails_without_partial_output() -> anyhow::Result<()> {
    init_logging();
    let raw = df! {
        "c0" => &[Some("CL1 Comdty"), Some("Date"), Some("01/07/2019")],
        "c1" => &[None, Some("PX_LAST"), Some("58.1")],
        "c2" => &[Some("CO1 Comdty"), Some("Date"), Some("01/07/2019")],
        "c3" => &[None, Some("CLOSE"), Some("64.5")],
    }?;

    let err = VendorReshaper::reshape(&raw).unwrap_err();
    assert!(matches!(err, FinmetricsError::Format(_)));
    Ok(())
}

#[test]
fn mixed_serial_and_text_dates_are_normalised() -> anyhow::Result<()> {
    init_logging();
    let raw = df! {
        "c0" => &[Some("CL1 Comdty"), Some("Date"), Some("2019/06/30"), Some("43647")],
        "c1" => &[None, Some("PX_LAST"), Some("58.1"), Some("59.3")],
    }?;

    let records = VendorReshaper::melt(&raw)?;
    assert_eq!(records.len(), 2);
    // 10-character text date untouched, serial converted to YYYY/MM/DD.
    assert_eq!(records[0].date, "2019/06/30");
    assert_eq!(records[1].date, "2019/07/01");
    Ok(())
}

#[test]
fn serial_date_epoch_convention() {
    init_logging();
    let date = excel_serial_to_date(1).unwrap();
    assert_eq!(date.format("%Y-%m-%d").to_string(), "1899-12-31");
}

#[test]
fn reshape_from_csv_file_roundtrip() -> anyhow::Result<()> {
    init_logging();
    let path = std::env::temp_dir().join("finmetrics_vendor_export.csv");
    {
        let mut file = std::fs::File::create(&path)?;
        writeln!(file, "CL1 Comdty,,CO1 Comdty,")?;
        writeln!(file, "Date,PX_LAST,Date,PX_LAST")?;
        writeln!(file, "01/07/2019,58.1,43647,64.5")?;
        writeln!(file, "02/07/2019,59.3,43648,65.0")?;
    }

    let raw = CsvConnector::load_raw(&path)?;
    let out = VendorReshaper::reshape(&raw)?;

    assert_eq!(out.height(), 4);
    let prices = out.column("price")?;
    let prices = prices.f64()?;
    assert_eq!(prices.get(0), Some(58.1));
    assert_eq!(prices.get(3), Some(65.0));

    std::fs::remove_file(&path)?;
    Ok(())
}
