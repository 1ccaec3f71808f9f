use datatracker_engine::*;

fn seed_example(store: &mut MemoryStore) -> anyhow::Result<(Category, Category)> {
    let km = store.create_category(NewCategory::new("Running", CategoryType::Normal, "km"))?;
    let depot = store.create_category(
        NewCategory::new("Depot", CategoryType::Savings, "€").with_auto_create(true),
    )?;

    store.create_entry(NewEntry::new(km.id, "2024-01", 5.0))?;
    store.create_entry(NewEntry::new(km.id, "2024-02", 7.0))?;
    store.create_entry(NewEntry::new(depot.id, "2024-01", 100.0).with_deposit(100.0))?;
    store.create_entry(NewEntry::new(depot.id, "2024-02", 110.0).with_deposit(0.0))?;

    Ok((km, depot))
}

fn month_range(start: &str, count: usize) -> anyhow::Result<Vec<String>> {
    let mut months = Vec::with_capacity(count);
    let mut current = start.to_string();
    for _ in 0..count {
        months.push(current.clone());
        current = next_month(&current)?;
    }
    Ok(months)
}

#[test]
fn test_worked_example_totals_and_timeseries() -> anyhow::Result<()> {
    let mut store = MemoryStore::new();
    let (km, depot) = seed_example(&mut store)?;
    let (categories, entries) = load_entries_by_category(&store)?;

    assert_eq!(category_total(&km, &entries[&km.id]), 12.0);
    assert_eq!(category_total(&depot, &entries[&depot.id]), 110.0);

    let series = dashboard_timeseries(&categories, &entries, None, None, None);

    let feb = series
        .total_value_data
        .iter()
        .find(|p| p.date == "2024-02")
        .expect("february point");
    assert_eq!(feb.value, 110.0);

    let savings_feb = series
        .savings_data
        .iter()
        .find(|p| p.date == "2024-02")
        .expect("february savings point");
    assert_eq!(savings_feb.value, 110.0);
    assert_eq!(savings_feb.deposits, 100.0);
    assert_eq!(savings_feb.profit, 10.0);

    let names: Vec<&str> = series
        .category_comparison
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["Running", "Depot"]);

    Ok(())
}

#[test]
fn test_savings_is_level_not_sum_over_long_history() -> anyhow::Result<()> {
    let mut store = MemoryStore::new();
    let depot =
        store.create_category(NewCategory::new("Depot", CategoryType::Savings, "€"))?;
    let budget =
        store.create_category(NewCategory::new("Spending", CategoryType::Normal, "€"))?;

    let months = month_range("2023-06", 14)?;
    for (i, month) in months.iter().enumerate() {
        let balance = 1000.0 + 100.0 * i as f64;
        store.create_entry(NewEntry::new(depot.id, month.as_str(), balance).with_deposit(100.0))?;
        if i % 2 == 0 {
            store.create_entry(NewEntry::new(budget.id, month.as_str(), 10.0))?;
        }
    }

    let series = Dashboard::default().timeseries_from_store(&store, &TimeseriesFilter::default())?;
    assert_eq!(series.total_value_data.len(), 14);

    for (i, point) in series.total_value_data.iter().enumerate() {
        let balance = 1000.0 + 100.0 * i as f64;
        let spending = 10.0 * (i / 2 + 1) as f64;
        assert!(
            (point.value - (balance + spending)).abs() < 1e-9,
            "{}: expected {}, got {}",
            point.date,
            balance + spending,
            point.value
        );
    }

    let last = series.savings_data.last().expect("savings data");
    assert_eq!(last.date, "2024-07");
    assert_eq!(last.value, 2300.0);
    assert_eq!(last.deposits, 1400.0);
    assert_eq!(last.profit, 900.0);

    let stats = Dashboard::default().stats_from_store(&store)?;
    let depot_stats = stats
        .category_sums
        .iter()
        .find(|c| c.id == depot.id)
        .expect("depot summary");
    assert_eq!(depot_stats.total_value, 2300.0);
    assert_eq!(depot_stats.entry_count, 14);
    assert_eq!(depot_stats.sparkline_data.len(), 10);
    assert_eq!(depot_stats.sparkline_data[0].date, "2023-10");
    assert_eq!(depot_stats.profit_percentage, Some(64.29));

    Ok(())
}

#[test]
fn test_reconcile_month_after_month() -> anyhow::Result<()> {
    let mut store = MemoryStore::new();
    let (km, depot) = seed_example(&mut store)?;
    store.update_category(
        km.id,
        CategoryUpdate {
            auto_create: Some(true),
            ..Default::default()
        },
    )?;
    store.create_entry(NewEntry::new(depot.id, "2024-03", 120.0).with_deposit(50.0))?;

    // March already exists for the depot, only the running category is filled
    let march = reconcile(&mut store, Some("2024-03"))?;
    assert_eq!(march.created.len(), 1);
    assert_eq!(march.created[0].category_id, km.id);

    let april = reconcile(&mut store, Some("2024-04"))?;
    assert_eq!(april.created.len(), 2);

    let depot_april = store
        .list_entries(depot.id)?
        .into_iter()
        .find(|e| e.date == "2024-04")
        .expect("april depot entry");
    assert_eq!(depot_april.value, 0.0);
    assert_eq!(depot_april.deposit, Some(50.0));
    assert!(depot_april.auto_generated);

    // The carried deposit keeps propagating
    let may = reconcile(&mut store, Some("2024-05"))?;
    assert_eq!(may.created.len(), 2);
    assert_eq!(store.last_entry(depot.id)?.and_then(|e| e.deposit), Some(50.0));

    let again = reconcile(&mut store, Some("2024-05"))?;
    assert!(again.created.is_empty());
    assert!(again.is_complete());

    Ok(())
}

#[test]
fn test_monthly_by_year_from_store() -> anyhow::Result<()> {
    let mut store = MemoryStore::new();
    let depot =
        store.create_category(NewCategory::new("Depot", CategoryType::Savings, "€"))?;
    for month in month_range("2022-11", 6)? {
        store.create_entry(NewEntry::new(depot.id, month.as_str(), 10.0).with_deposit(1.0))?;
    }

    let all = monthly_stats(&store, depot.id, None, None)?;
    let years: Vec<&str> = all.years.keys().map(String::as_str).collect();
    assert_eq!(years, vec!["2022", "2023"]);
    assert_eq!(all.years["2022"].values[10], 10.0);
    assert_eq!(all.years["2023"].deposits[3], 1.0);
    assert_eq!(all.years["2023"].values[4], 0.0);

    let only_2023 = monthly_stats(&store, depot.id, Some(2023), None)?;
    assert_eq!(only_2023.years.len(), 1);

    let json = serde_json::to_value(&only_2023)?;
    assert_eq!(json["category_id"], depot.id);
    assert_eq!(json["years"]["2023"]["values"].as_array().map(Vec::len), Some(12));

    Ok(())
}

#[test]
fn test_custom_currency_marker() -> anyhow::Result<()> {
    let config = EngineConfig::from_json(r#"{"currency_unit": "$"}"#)?;
    let mut store = MemoryStore::with_config(config.clone());

    let depot =
        store.create_category(NewCategory::new("Brokerage", CategoryType::Savings, "€"))?;
    assert_eq!(depot.unit, "$");
    let euros = store.create_category(NewCategory::new("Cash", CategoryType::Normal, "€"))?;

    store.create_entry(NewEntry::new(depot.id, "2024-01", 50.0))?;
    store.create_entry(NewEntry::new(euros.id, "2024-01", 30.0))?;

    let series =
        Dashboard::new(config).timeseries_from_store(&store, &TimeseriesFilter::default())?;
    assert_eq!(series.total_value_data[0].value, 50.0);
    assert_eq!(series.category_comparison.len(), 2);

    Ok(())
}

#[test]
fn test_overview_with_filters() -> anyhow::Result<()> {
    let mut store = MemoryStore::new();
    let (km, _) = seed_example(&mut store)?;

    let everything = stats_overview(&store, &EntryQuery::default())?;
    assert_eq!(everything.count, 4);
    assert_eq!(everything.sum, 222.0);
    assert_eq!(everything.min, Some(5.0));
    assert_eq!(everything.max, Some(110.0));

    let ids = parse_id_list(&km.id.to_string())?;
    let running = stats_overview(
        &store,
        &EntryQuery {
            category_ids: ids,
            ..Default::default()
        },
    )?;
    assert_eq!(running.count, 2);
    assert_eq!(running.avg, 6.0);
    assert_eq!(running.total_deposit, 0.0);

    let nothing = stats_overview(
        &store,
        &EntryQuery {
            from_date: Some("2030-01".to_string()),
            ..Default::default()
        },
    )?;
    assert_eq!(nothing.count, 0);
    assert_eq!(nothing.min, None);

    Ok(())
}

#[test]
fn test_dashboard_output_round_trips_through_json() -> anyhow::Result<()> {
    let mut store = MemoryStore::new();
    seed_example(&mut store)?;

    let series = Dashboard::default()
        .timeseries_from_store(&store, &TimeseriesFilter::between("2024-01", "2024-12"))?;
    let json = serde_json::to_string(&series)?;
    assert!(json.contains("\"sparenData\""));

    let parsed: DashboardTimeseries = serde_json::from_str(&json)?;
    assert_eq!(parsed, series);

    Ok(())
}
