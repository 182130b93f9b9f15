use trigrid::{Grid, GridConfig, SearchConfig};
use validator::ValidationErrors;

#[test]
fn test_grid_config_validation() {
    let config = GridConfig {
        width: 1,      // invalid (too small)
        height: 10001, // invalid (too big)
        search: SearchConfig {
            max_expansions: 0, // invalid
        },
    };

    let err = Grid::<()>::from_config(&config).unwrap_err();
    let validation_errors = err.downcast::<ValidationErrors>().unwrap();
    let mut error_fields = validation_errors
        .errors()
        .keys()
        .copied()
        .collect::<Vec<&str>>();
    error_fields.sort_unstable();
    assert_eq!(
        error_fields,
        vec!["height", "search", "width"],
        "incorrect validation errors in {:#?}",
        validation_errors
    );
}

#[test]
fn test_grid_config_from_json() {
    let config: GridConfig = serde_json::from_str(
        r#"{"width": 4, "height": 3, "search": {"max_expansions": 50}}"#,
    )
    .unwrap();
    let grid: Grid = Grid::from_config(&config).unwrap();
    assert_eq!(grid.width(), 4);
    assert_eq!(grid.height(), 3);
    assert_eq!(grid.path_finder().config().max_expansions, 50);

    // Missing fields fall back to the defaults
    let config: GridConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, GridConfig::default());
}
