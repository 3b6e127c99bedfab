// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use betjournal::Journal;
use betjournal::models::{Fixture, MethodExecution, ReferenceKind};
use betjournal::store::Store;
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

pub struct Catalog {
    pub brasileirao: String,
    pub copa: String,
    pub flamengo: String,
    pub palmeiras: String,
    pub back_favorito: String,
    pub lay_empate: String,
    pub match_odds: String,
    pub over_under: String,
}

pub fn seed<S: Store>(journal: &Journal<S>) -> Catalog {
    let add = |kind, name| journal.add_item(kind, name).unwrap().id;
    Catalog {
        brasileirao: add(ReferenceKind::Competition, "Brasileirão"),
        copa: add(ReferenceKind::Competition, "Copa do Brasil"),
        flamengo: add(ReferenceKind::Team, "Flamengo"),
        palmeiras: add(ReferenceKind::Team, "Palmeiras"),
        back_favorito: add(ReferenceKind::Method, "Back Favorito"),
        lay_empate: add(ReferenceKind::Method, "Lay Empate"),
        match_odds: add(ReferenceKind::Market, "Match Odds"),
        over_under: add(ReferenceKind::Market, "Over/Under"),
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn fixture(c: &Catalog, competition: &str, day: NaiveDate) -> Fixture {
    Fixture {
        data_jogo: day,
        hora_jogo: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
        id_competicao: competition.to_string(),
        id_equipe_casa: c.flamengo.clone(),
        id_equipe_fora: c.palmeiras.clone(),
    }
}

pub fn exec(method: &str, market: &str, stake: i64, result: i64) -> MethodExecution {
    MethodExecution::new(method, market, Decimal::from(stake), Decimal::new(250, 2))
        .with_result(Decimal::from(result))
}
