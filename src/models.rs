// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::store::Collection;

/// Declares a closed set of journal options serialised by their display label.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().to_lowercase() == wanted)
                    .ok_or_else(|| {
                        let options: Vec<&str> = $name::ALL.iter().map(|v| v.label()).collect();
                        format!(
                            "Invalid {} '{}', expected one of: {}",
                            stringify!($name),
                            s.trim(),
                            options.join(", ")
                        )
                    })
            }
        }
    };
}

labelled_enum!(Momento {
    BoaFase => "Boa Fase",
    MaFase => "Má fase",
    EmConstrucao => "Equipe em construção",
    TecnicoInterino => "Técnico interino",
    Irregular => "Irregular",
    EmCrise => "Em Crise",
    Regular => "Regular",
});

labelled_enum!(MustWin {
    Titulo => "Título",
    Rebaixamento => "Rebaixamento",
    ClassificacaoCompeticoes => "Classificação competições importantes",
    Classico => "Clássico",
    QuebraTabus => "Quebra de Tabus",
    ProximaFase => "Classificação próxima fase",
    Irrelevante => "Irrelevante",
});

labelled_enum!(ImportanciaPartida {
    MaisImportante => "Mais importante",
    MenosImportante => "Menos importante",
    MesmaImportancia => "Mesma importância",
    SemImportancia => "Sem importância",
});

labelled_enum!(Desfalques {
    Goleador => "Goleador",
    Capitao => "Capitão",
    Tecnico => "Técnico",
    JogadorImportante => "Jogador Importante",
    JogadorDecisivo => "Jogador Decisivo",
    SemDesfalques => "Sem desfalques importantes",
});

labelled_enum!(Tendencia {
    MDominante => "M Dominante",
    VDominante => "V Dominante",
    Trocacao => "Trocação",
    JogoTruncado => "Jogo Truncado",
    JogoComplexo => "Jogo Complexo",
    JogoMorno => "Jogo Morno",
});

labelled_enum!(SituacaoCasaFora {
    OtimoVsOtimo => "Ótimo M vs Ótimo V",
    OtimoVsPessimo => "Ótimo M vs Péssimo V",
    OtimoVsRegular => "Ótimo M vs Regular V",
    PessimoVsOtimo => "Péssimo M vs Ótimo V",
    PessimoVsPessimo => "Péssimo M vs Péssimo V",
    RegularVsOtimo => "Regular M vs Ótimo V",
    RegularVsPessimo => "Regular M vs Péssimo V",
    RegularVsRegular => "Regular M vs Regular V",
});

labelled_enum!(ValorPotencial {
    OddsJustas => "Odds Justas",
    OddsEsmagadas => "Odds Esmagadas",
    OddsSemValor => "Odds sem Valor",
    OddsBoas => "Odds Boas",
});

labelled_enum!(#[derive(Default)] EstadoEmocional {
    Ansioso => "Ansioso",
    Calmo => "Calmo",
    Euforico => "Eufórico",
    Fodase => "Foda-se",
    Frustrado => "Frustrado",
    Irritado => "Irritado",
    #[default]
    Neutro => "Neutro",
});

labelled_enum!(#[derive(Default)] MotivacaoEntrada {
    Aleatoria => "Aleatória",
    #[default]
    AnalisePreJogo => "Análise/Método Pré-Jogo",
    Intuicao => "Intuição/Feeling",
    Fomo => "Medo de perder oportunidade",
    RecuperarPrejuizo => "Recuperar prejuízo",
    SinalTecnico => "Sinal técnico",
});

labelled_enum!(#[derive(Default)] AutoAvaliacao {
    Excelente => "Excelente",
    Boa => "Boa",
    #[default]
    Regular => "Regular",
    Ruim => "Ruim",
    Pessima => "Péssima",
});

/// The four kinds of reference data a trading record points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Team,
    Competition,
    Market,
    Method,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 4] = [
        ReferenceKind::Team,
        ReferenceKind::Competition,
        ReferenceKind::Market,
        ReferenceKind::Method,
    ];

    pub fn collection(self) -> Collection {
        match self {
            ReferenceKind::Team => Collection::Teams,
            ReferenceKind::Competition => Collection::Competitions,
            ReferenceKind::Market => Collection::Markets,
            ReferenceKind::Method => Collection::Methods,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReferenceKind::Team => "Team",
            ReferenceKind::Competition => "Competition",
            ReferenceKind::Market => "Market",
            ReferenceKind::Method => "Method",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReferenceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "team" | "teams" => Ok(ReferenceKind::Team),
            "competition" | "competitions" => Ok(ReferenceKind::Competition),
            "market" | "markets" => Ok(ReferenceKind::Market),
            "method" | "methods" => Ok(ReferenceKind::Method),
            other => Err(format!("Unknown reference type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub id: String,
    pub nome: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Convert,
    Conclude,
    /// Reserved: no transition un-concludes a record.
    Reopen,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Convert => "convert",
            AuditAction::Conclude => "conclude",
            AuditAction::Reopen => "reopen",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub action: AuditAction,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodExecution {
    #[serde(rename = "methodId")]
    pub method_id: String,
    #[serde(rename = "marketId")]
    pub market_id: String,
    pub stake: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resultado_financeiro: Option<Decimal>,
    pub odd_entrada: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odd_saida: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo_exposicao: Option<Decimal>,
    pub seguiu_plano: bool,
    #[serde(default)]
    pub estado_emocional: EstadoEmocional,
    #[serde(default)]
    pub motivacao_entrada: MotivacaoEntrada,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivacao_saida: Option<String>,
    #[serde(default)]
    pub autoavaliacao: AutoAvaliacao,
}

impl MethodExecution {
    pub fn new(method_id: &str, market_id: &str, stake: Decimal, odd_entrada: Decimal) -> Self {
        Self {
            method_id: method_id.to_string(),
            market_id: market_id.to_string(),
            stake,
            resultado_financeiro: None,
            odd_entrada,
            odd_saida: None,
            tempo_exposicao: None,
            seguiu_plano: true,
            estado_emocional: EstadoEmocional::default(),
            motivacao_entrada: MotivacaoEntrada::default(),
            motivacao_saida: None,
            autoavaliacao: AutoAvaliacao::default(),
        }
    }

    pub fn with_result(mut self, result: Decimal) -> Self {
        self.resultado_financeiro = Some(result);
        self
    }

    pub fn result_or_zero(&self) -> Decimal {
        self.resultado_financeiro.unwrap_or(Decimal::ZERO)
    }
}

/// The match a record is about; required in both modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub data_jogo: NaiveDate,
    pub hora_jogo: NaiveTime,
    pub id_competicao: String,
    pub id_equipe_casa: String,
    pub id_equipe_fora: String,
}

/// Qualitative pre-match assessment plus the archival stamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classificacao_m: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classificacao_v: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momento_m: Option<Momento>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momento_v: Option<Momento>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_win_m: Option<MustWin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_win_v: Option<MustWin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importancia_prox_partida_m: Option<ImportanciaPartida>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importancia_prox_partida_v: Option<ImportanciaPartida>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desfalques_m: Option<Desfalques>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desfalques_v: Option<Desfalques>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tendencia_esperada: Option<Tendencia>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub situacao_casa_fora: Option<SituacaoCasaFora>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor_potencial: Option<ValorPotencial>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destaque_essencial: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justificativa_nao_operacao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_envio_historico: Option<DateTime<Utc>>,
}

impl PreAnalysis {
    pub fn is_archived(&self) -> bool {
        self.data_envio_historico.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// Assessment carried over from the pre-analysis; inert once operated.
    pub analysis: PreAnalysis,
    pub method_executions: Vec<MethodExecution>,
    pub concluido: bool,
    pub data_conclusao: Option<DateTime<Utc>>,
}

impl Operation {
    pub fn new(method_executions: Vec<MethodExecution>) -> Self {
        Self {
            analysis: PreAnalysis::default(),
            method_executions,
            concluido: false,
            data_conclusao: None,
        }
    }

    /// Sum of the execution results; `None` if it overflows.
    pub fn total_result(&self) -> Option<Decimal> {
        self.method_executions
            .iter()
            .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.result_or_zero()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    PreAnalysis(PreAnalysis),
    Operation(Operation),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TradingDocument", into = "TradingDocument")]
pub struct Trading {
    pub id: String,
    pub fixture: Fixture,
    pub stage: Stage,
    pub data_hora_registro: DateTime<Utc>,
    pub audit_log: Vec<AuditLogEntry>,
}

impl Trading {
    pub fn operar(&self) -> bool {
        matches!(self.stage, Stage::Operation(_))
    }

    pub fn concluido(&self) -> bool {
        matches!(&self.stage, Stage::Operation(op) if op.concluido)
    }

    pub fn analysis(&self) -> &PreAnalysis {
        match &self.stage {
            Stage::PreAnalysis(a) => a,
            Stage::Operation(op) => &op.analysis,
        }
    }

    pub fn operation(&self) -> Option<&Operation> {
        match &self.stage {
            Stage::Operation(op) => Some(op),
            Stage::PreAnalysis(_) => None,
        }
    }

    pub fn executions(&self) -> &[MethodExecution] {
        match &self.stage {
            Stage::Operation(op) => &op.method_executions,
            Stage::PreAnalysis(_) => &[],
        }
    }
}

/// Flat persisted shape of a trading record, `operar` discriminating the mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TradingDocument {
    id: String,
    #[serde(flatten)]
    fixture: Fixture,
    operar: bool,
    #[serde(flatten)]
    analysis: PreAnalysis,
    #[serde(
        rename = "methodExecutions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    method_executions: Option<Vec<MethodExecution>>,
    #[serde(default)]
    concluido: bool,
    data_hora_registro: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_conclusao: Option<DateTime<Utc>>,
    #[serde(rename = "auditLog", default)]
    audit_log: Vec<AuditLogEntry>,
}

impl TryFrom<TradingDocument> for Trading {
    type Error = String;

    fn try_from(doc: TradingDocument) -> Result<Self, Self::Error> {
        let stage = if doc.operar {
            Stage::Operation(Operation {
                analysis: doc.analysis,
                method_executions: doc.method_executions.unwrap_or_default(),
                concluido: doc.concluido,
                data_conclusao: doc.data_conclusao,
            })
        } else {
            if doc.concluido {
                return Err(format!(
                    "trading record {} is a concluded pre-analysis",
                    doc.id
                ));
            }
            Stage::PreAnalysis(doc.analysis)
        };
        Ok(Trading {
            id: doc.id,
            fixture: doc.fixture,
            stage,
            data_hora_registro: doc.data_hora_registro,
            audit_log: doc.audit_log,
        })
    }
}

impl From<Trading> for TradingDocument {
    fn from(t: Trading) -> Self {
        let (operar, analysis, method_executions, concluido, data_conclusao) = match t.stage {
            Stage::PreAnalysis(a) => (false, a, None, false, None),
            Stage::Operation(op) => (
                true,
                op.analysis,
                Some(op.method_executions),
                op.concluido,
                op.data_conclusao,
            ),
        };
        TradingDocument {
            id: t.id,
            fixture: t.fixture,
            operar,
            analysis,
            method_executions,
            concluido,
            data_hora_registro: t.data_hora_registro,
            data_conclusao,
            audit_log: t.audit_log,
        }
    }
}

/// Input for a new trading record; id, timestamps and audit log are assigned on create.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrading {
    pub fixture: Fixture,
    pub operar: bool,
    pub analysis: PreAnalysis,
    pub method_executions: Vec<MethodExecution>,
}

impl NewTrading {
    pub fn pre_analysis(fixture: Fixture, analysis: PreAnalysis) -> Self {
        Self {
            fixture,
            operar: false,
            analysis,
            method_executions: Vec::new(),
        }
    }

    pub fn operation(fixture: Fixture, method_executions: Vec<MethodExecution>) -> Self {
        Self {
            fixture,
            operar: true,
            analysis: PreAnalysis::default(),
            method_executions,
        }
    }
}
