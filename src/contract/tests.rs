use super::*;
use blackjack_strategy::{basic_strategy, PlayingStrategy, DEFAULT_BETTING, DEFAULT_PLAYING};
use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier, MockStorage};
use cosmwasm_std::{from_json, Addr, OwnedDeps};

use crate::error::ContractError;
use crate::msg::{
    BettingRuleMsg, BettingStrategyMsg, ExecuteMsg, InstantiateMsg, LibraryEntry, PlayingTable,
    QueryMsg, StrategyKind,
};

const AUTHOR: &str = "cosmwasm1zg63vla7v7svzpxatp6y0v5fuv8vml5u7e66ax";

fn setup() -> OwnedDeps<MockStorage, MockApi, MockQuerier> {
    let mut deps = mock_dependencies();
    let info = message_info(&Addr::unchecked(AUTHOR), &[]);
    instantiate(deps.as_mut(), mock_env(), info, InstantiateMsg::with_defaults()).unwrap();
    deps
}

fn run(
    deps: &mut OwnedDeps<MockStorage, MockApi, MockQuerier>,
    msg: ExecuteMsg,
) -> Result<cosmwasm_std::Response, ContractError> {
    let info = message_info(&Addr::unchecked(AUTHOR), &[]);
    execute(deps.as_mut(), mock_env(), info, msg)
}

fn list(deps: &OwnedDeps<MockStorage, MockApi, MockQuerier>, kind: StrategyKind) -> Vec<LibraryEntry> {
    let res = query(deps.as_ref(), mock_env(), QueryMsg::ListStrategies { kind }).unwrap();
    from_json(&res).unwrap()
}

fn get_playing(deps: &OwnedDeps<MockStorage, MockApi, MockQuerier>, name: &str) -> Option<PlayingTable> {
    let res = query(deps.as_ref(), mock_env(), QueryMsg::GetPlaying { name: name.to_string() }).unwrap();
    from_json(&res).unwrap()
}

fn attr<'a>(res: &'a cosmwasm_std::Response, key: &str) -> &'a str {
    res.attributes
        .iter()
        .find(|a| a.key == key)
        .map(|a| a.value.as_str())
        .unwrap()
}

fn ramp() -> BettingStrategyMsg {
    BettingStrategyMsg {
        name: "ramp".to_string(),
        description: "two step".to_string(),
        rules: vec![
            BettingRuleMsg {
                condition: "true_count >= 5".to_string(),
                action: "bet".to_string(),
                value: 3,
            },
            BettingRuleMsg {
                condition: "true_count >= 2".to_string(),
                action: "bet".to_string(),
                value: 2,
            },
        ],
    }
}

#[test]
fn test_instantiate_seeds_builtins() {
    let deps = setup();

    let playing = list(&deps, StrategyKind::Playing);
    assert_eq!(
        playing,
        vec![LibraryEntry {
            name: DEFAULT_PLAYING.to_string(),
            is_custom: false,
            kind: StrategyKind::Playing,
        }]
    );

    let betting = list(&deps, StrategyKind::Betting);
    let names: Vec<&str> = betting.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec![DEFAULT_BETTING, "hi_lo_spread"]);
    assert!(betting.iter().all(|e| !e.is_custom));
}

#[test]
fn test_builtin_playing_is_served_flat() {
    let deps = setup();
    let table = get_playing(&deps, DEFAULT_PLAYING).unwrap();
    assert_eq!(table, basic_strategy().to_table());
    assert_eq!(get_playing(&deps, "s17_basic_strategy.json"), Some(table));
    assert_eq!(get_playing(&deps, "missing"), None);
}

#[test]
fn test_save_playing_creates_then_updates() {
    let mut deps = setup();
    let mut strategy = basic_strategy();
    strategy.set("16", "T", "S").unwrap();

    let res = run(
        &mut deps,
        ExecuteMsg::SavePlaying {
            name: "my_plan".to_string(),
            strategy: strategy.to_table(),
        },
    )
    .unwrap();
    assert_eq!(attr(&res, "result"), "created");
    assert_eq!(attr(&res, "message"), "Playing strategy 'my_plan' saved successfully.");

    let entries = list(&deps, StrategyKind::Playing);
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().any(|e| e.name == "my_plan" && e.is_custom));

    strategy.set("16", "T", "H").unwrap();
    let res = run(
        &mut deps,
        ExecuteMsg::SavePlaying {
            name: "my_plan.json".to_string(),
            strategy: strategy.to_table(),
        },
    )
    .unwrap();
    assert_eq!(attr(&res, "result"), "updated");

    let stored = get_playing(&deps, "my_plan").unwrap();
    assert_eq!(PlayingStrategy::from_table(&stored).0, strategy);
    assert_eq!(list(&deps, StrategyKind::Playing).len(), 2);
}

#[test]
fn test_save_over_builtin_is_rejected() {
    let mut deps = setup();
    let mut table = basic_strategy().to_table();
    table.get_mut("12").unwrap().insert("2".to_string(), "S".to_string());

    let err = run(
        &mut deps,
        ExecuteMsg::SavePlaying {
            name: DEFAULT_PLAYING.to_string(),
            strategy: table,
        },
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::ImmutableEntry { kind: StrategyKind::Playing, .. }));
    assert_eq!(get_playing(&deps, DEFAULT_PLAYING).unwrap(), basic_strategy().to_table());

    let err = run(
        &mut deps,
        ExecuteMsg::SaveBetting {
            name: DEFAULT_BETTING.to_string(),
            strategy: ramp(),
        },
    )
    .unwrap_err();
    assert!(err.to_string().contains("is built-in and cannot be modified or deleted"));
}

#[test]
fn test_save_incomplete_playing_is_rejected() {
    let mut deps = setup();
    let mut table = basic_strategy().to_table();
    table.remove("AA");

    let err = run(
        &mut deps,
        ExecuteMsg::SavePlaying {
            name: "holes".to_string(),
            strategy: table,
        },
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::InvalidStrategy { .. }));
    assert_eq!(list(&deps, StrategyKind::Playing).len(), 1);
}

#[test]
fn test_save_rejects_bad_names() {
    let mut deps = setup();
    for name in ["", "  ", "../up", "a/b"] {
        let err = run(
            &mut deps,
            ExecuteMsg::SaveBetting {
                name: name.to_string(),
                strategy: ramp(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidName { .. }), "{name:?}");
    }
}

#[test]
fn test_save_betting_round_trip() {
    let mut deps = setup();
    let res = run(
        &mut deps,
        ExecuteMsg::SaveBetting {
            name: "ramp_v2".to_string(),
            strategy: ramp(),
        },
    )
    .unwrap();
    assert_eq!(attr(&res, "kind"), "betting");

    let res = query(deps.as_ref(), mock_env(), QueryMsg::GetBetting { name: "ramp_v2".to_string() }).unwrap();
    let stored: Option<BettingStrategyMsg> = from_json(&res).unwrap();
    let stored = stored.unwrap();
    assert_eq!(stored.name, "ramp_v2");
    assert_eq!(stored.rules, ramp().rules);
}

#[test]
fn test_save_betting_with_malformed_rule() {
    let mut deps = setup();
    let mut strategy = ramp();
    strategy.rules[1].condition = "running_count >= 2".to_string();

    let err = run(
        &mut deps,
        ExecuteMsg::SaveBetting {
            name: "broken".to_string(),
            strategy,
        },
    )
    .unwrap_err();
    assert!(err.to_string().contains("Malformed condition"));
}

#[test]
fn test_delete_custom_and_builtin() {
    let mut deps = setup();
    run(
        &mut deps,
        ExecuteMsg::SaveBetting {
            name: "ramp".to_string(),
            strategy: ramp(),
        },
    )
    .unwrap();
    assert_eq!(list(&deps, StrategyKind::Betting).len(), 3);

    let res = run(
        &mut deps,
        ExecuteMsg::DeleteStrategy {
            kind: StrategyKind::Betting,
            name: "ramp".to_string(),
        },
    )
    .unwrap();
    assert_eq!(attr(&res, "message"), "Betting strategy 'ramp' deleted successfully.");
    assert_eq!(list(&deps, StrategyKind::Betting).len(), 2);

    let err = run(
        &mut deps,
        ExecuteMsg::DeleteStrategy {
            kind: StrategyKind::Betting,
            name: DEFAULT_BETTING.to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::ImmutableEntry { .. }));
    assert_eq!(list(&deps, StrategyKind::Betting).len(), 2);

    let err = run(
        &mut deps,
        ExecuteMsg::DeleteStrategy {
            kind: StrategyKind::Playing,
            name: "ramp".to_string(),
        },
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "playing strategy 'ramp' not found");
}
