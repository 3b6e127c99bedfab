// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use betjournal::models::{NewTrading, PreAnalysis, ReferenceKind};
use betjournal::store::MemoryStore;
use betjournal::{Journal, JournalError};

#[test]
fn add_trims_and_rejects_case_insensitive_duplicates() {
    let journal = Journal::new(MemoryStore::new());
    let item = journal.add_item(ReferenceKind::Team, "  Flamengo ").unwrap();
    assert_eq!(item.nome, "Flamengo");

    let err = journal.add_item(ReferenceKind::Team, "flamengo").unwrap_err();
    assert!(matches!(err, JournalError::DuplicateName { kind: ReferenceKind::Team, .. }));
    assert_eq!(journal.list_items(ReferenceKind::Team).unwrap().len(), 1);

    // Same name under another kind is fine.
    journal.add_item(ReferenceKind::Competition, "Flamengo").unwrap();
}

#[test]
fn empty_name_is_rejected() {
    let journal = Journal::new(MemoryStore::new());
    let err = journal.add_item(ReferenceKind::Market, "   ").unwrap_err();
    assert!(matches!(err, JournalError::Validation(_)));
    assert!(journal.list_items(ReferenceKind::Market).unwrap().is_empty());
}

#[test]
fn list_sorts_ignoring_case_and_accents() {
    let journal = Journal::new(MemoryStore::new());
    for name in ["Vasco", "Ávaí", "botafogo", "Atlético"] {
        journal.add_item(ReferenceKind::Team, name).unwrap();
    }
    let names: Vec<String> = journal
        .list_items(ReferenceKind::Team)
        .unwrap()
        .into_iter()
        .map(|i| i.nome)
        .collect();
    assert_eq!(names, vec!["Atlético", "Ávaí", "botafogo", "Vasco"]);
}

#[test]
fn rename_checks_collisions_but_allows_recasing_itself() {
    let journal = Journal::new(MemoryStore::new());
    let over = journal.add_item(ReferenceKind::Method, "Over 2.5").unwrap();
    journal.add_item(ReferenceKind::Method, "Lay Empate").unwrap();

    let err = journal
        .rename_item(ReferenceKind::Method, &over.id, "LAY EMPATE")
        .unwrap_err();
    assert!(matches!(err, JournalError::DuplicateName { .. }));

    journal
        .rename_item(ReferenceKind::Method, &over.id, "OVER 2.5")
        .unwrap();
    let renamed = journal.get_item(ReferenceKind::Method, &over.id).unwrap().unwrap();
    assert_eq!(renamed.nome, "OVER 2.5");

    let err = journal
        .rename_item(ReferenceKind::Method, "missing", "Anything")
        .unwrap_err();
    assert!(matches!(err, JournalError::NotFound { .. }));
}

#[test]
fn resolve_by_id_or_name() {
    let journal = Journal::new(MemoryStore::new());
    let item = journal.add_item(ReferenceKind::Competition, "Brasileirão").unwrap();

    assert_eq!(journal.resolve_item(ReferenceKind::Competition, &item.id).unwrap(), item);
    assert_eq!(journal.resolve_item(ReferenceKind::Competition, "brasileirão").unwrap(), item);
    assert!(matches!(
        journal.resolve_item(ReferenceKind::Competition, "Série B"),
        Err(JournalError::NotFound { .. })
    ));
}

#[test]
fn remove_refuses_items_in_use() {
    let journal = Journal::new(MemoryStore::new());
    let c = common::seed(&journal);
    let t = journal
        .create_trading(NewTrading::operation(
            common::fixture(&c, &c.brasileirao, common::date("2025-03-01")),
            vec![common::exec(&c.lay_empate, &c.match_odds, 100, 40)],
        ))
        .unwrap();

    match journal.remove_item(ReferenceKind::Market, &c.match_odds).unwrap_err() {
        JournalError::InUse { trading_id, .. } => assert_eq!(trading_id, t.id),
        other => panic!("unexpected error: {other}"),
    }
    assert!(journal.remove_item(ReferenceKind::Team, &c.flamengo).is_err());
    assert!(journal.remove_item(ReferenceKind::Competition, &c.brasileirao).is_err());
    assert!(journal.remove_item(ReferenceKind::Method, &c.lay_empate).is_err());

    // Unused items go straight away.
    journal.remove_item(ReferenceKind::Market, &c.over_under).unwrap();
    assert!(journal.get_item(ReferenceKind::Market, &c.over_under).unwrap().is_none());

    journal.delete_trading(&t.id).unwrap();
    journal.remove_item(ReferenceKind::Market, &c.match_odds).unwrap();
}

#[test]
fn pre_analysis_does_not_pin_methods_or_markets() {
    let journal = Journal::new(MemoryStore::new());
    let c = common::seed(&journal);
    journal
        .create_trading(NewTrading::pre_analysis(
            common::fixture(&c, &c.copa, common::date("2099-01-01")),
            PreAnalysis::default(),
        ))
        .unwrap();

    journal.remove_item(ReferenceKind::Method, &c.back_favorito).unwrap();
    journal.remove_item(ReferenceKind::Market, &c.over_under).unwrap();
    assert!(journal.remove_item(ReferenceKind::Competition, &c.copa).is_err());
}
