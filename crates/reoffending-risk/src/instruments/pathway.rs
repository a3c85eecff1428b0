//! Composite intervention pathway.
//!
//! Runs after the independent instruments and consumes their results. A
//! missing upstream result is never guessed at: the whole classification is
//! withheld and a single error names every absent instrument.

use super::general::GeneralScore;
use super::learning_needs::LearningNeedsScore;
use super::sexual_contact::SexualContactScore;
use super::sexual_image::SexualImageScore;
use super::violent::ViolentScore;
use super::Instrument;
use crate::scoring::{Ordinal, ProblemLevel, RiskBand, ScoreResult, SupervisionStatus, ValidationErrors};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Pathway {
    HighIntensity,
    ModerateIntensity,
    LowIntensity,
    StandardManagement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NeedDomain {
    Thinking,
    Attitudes,
    Relationships,
    SelfManagement,
    Sexual,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedRatings {
    pub pro_criminal_attitudes: Option<ProblemLevel>,
    pub hostile_orientation: Option<ProblemLevel>,
    pub impulsivity: Option<ProblemLevel>,
    pub temper_control: Option<ProblemLevel>,
    pub problem_solving: Option<ProblemLevel>,
    pub coping: Option<ProblemLevel>,
    pub relationship_quality: Option<ProblemLevel>,
    pub sexual_preoccupation: Option<ProblemLevel>,
    pub offence_related_sexual_interest: Option<ProblemLevel>,
}

impl NeedRatings {
    fn domain(&self, domain: NeedDomain) -> Vec<(&'static str, Option<ProblemLevel>)> {
        match domain {
            NeedDomain::Thinking => vec![
                ("needs.impulsivity", self.impulsivity),
                ("needs.temper_control", self.temper_control),
                ("needs.problem_solving", self.problem_solving),
            ],
            NeedDomain::Attitudes => vec![
                ("needs.pro_criminal_attitudes", self.pro_criminal_attitudes),
                ("needs.hostile_orientation", self.hostile_orientation),
            ],
            NeedDomain::Relationships => {
                vec![("needs.relationship_quality", self.relationship_quality)]
            }
            NeedDomain::SelfManagement => vec![("needs.coping", self.coping)],
            NeedDomain::Sexual => vec![
                ("needs.sexual_preoccupation", self.sexual_preoccupation),
                (
                    "needs.offence_related_sexual_interest",
                    self.offence_related_sexual_interest,
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathwayInput {
    pub supervision_status: SupervisionStatus,
    #[serde(default)]
    pub sexual_offence_history: bool,
    /// Band from an external partner-violence assessment, if one was run.
    #[serde(default)]
    pub partner_violence_band: Option<RiskBand>,
    #[serde(default)]
    pub other_harm_band: Option<RiskBand>,
    #[serde(default)]
    pub needs: NeedRatings,
}

/// Results of the instruments the pathway depends on; `None` when the
/// instrument was not requested or failed validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpstreamScores<'a> {
    pub general: Option<&'a GeneralScore>,
    pub violent: Option<&'a ViolentScore>,
    pub sexual_contact: Option<&'a SexualContactScore>,
    pub sexual_image: Option<&'a SexualImageScore>,
    pub learning_needs: Option<&'a LearningNeedsScore>,
}

/// Upstream results every pathway classification reads.
#[derive(Debug, Clone, Copy)]
pub struct RequiredUpstream<'a> {
    pub general: &'a GeneralScore,
    pub violent: &'a ViolentScore,
    pub learning_needs: &'a LearningNeedsScore,
}

impl<'a> UpstreamScores<'a> {
    /// The always-required results, or every required instrument that has
    /// none.
    pub fn required(
        &self,
        sexual_offence_history: bool,
    ) -> Result<RequiredUpstream<'a>, Vec<Instrument>> {
        match (self.general, self.violent, self.learning_needs) {
            (Some(general), Some(violent), Some(learning_needs))
                if self.missing(sexual_offence_history).is_empty() =>
            {
                Ok(RequiredUpstream {
                    general,
                    violent,
                    learning_needs,
                })
            }
            _ => Err(self.missing(sexual_offence_history)),
        }
    }

    /// Required instruments without a result. The sexual instruments are
    /// only required for subjects with a sexual-offence history.
    pub fn missing(&self, sexual_offence_history: bool) -> Vec<Instrument> {
        let mut missing = Vec::new();
        if self.general.is_none() {
            missing.push(Instrument::General);
        }
        if self.violent.is_none() {
            missing.push(Instrument::Violent);
        }
        if sexual_offence_history {
            if self.sexual_contact.is_none() {
                missing.push(Instrument::SexualContact);
            }
            if self.sexual_image.is_none() {
                missing.push(Instrument::SexualImage);
            }
        }
        if self.learning_needs.is_none() {
            missing.push(Instrument::LearningNeeds);
        }
        missing
    }
}

/// Inclusive lower bounds of the medium and high levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelThresholds<T> {
    pub medium_from: T,
    pub high_from: T,
}

impl<T: PartialOrd + Copy> LevelThresholds<T> {
    pub fn level(&self, value: T) -> Level {
        if value >= self.high_from {
            Level::High
        } else if value >= self.medium_from {
            Level::Medium
        } else {
            Level::Low
        }
    }

    fn is_ordered(&self) -> bool {
        self.medium_from <= self.high_from
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskTriggers {
    /// Two-year general reoffending percentage.
    pub general: LevelThresholds<u8>,
    /// Two-year violent reoffending percentage.
    pub violent: LevelThresholds<u8>,
    /// Higher of the two sexual reoffending bands.
    pub sexual: LevelThresholds<RiskBand>,
    /// Partner-violence and other-harm bands.
    pub harm: LevelThresholds<RiskBand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCutPoints {
    pub thinking: LevelThresholds<u32>,
    pub attitudes: LevelThresholds<u32>,
    pub relationships: LevelThresholds<u32>,
    pub self_management: LevelThresholds<u32>,
    pub sexual: LevelThresholds<u32>,
}

impl DomainCutPoints {
    fn for_domain(&self, domain: NeedDomain) -> &LevelThresholds<u32> {
        match domain {
            NeedDomain::Thinking => &self.thinking,
            NeedDomain::Attitudes => &self.attitudes,
            NeedDomain::Relationships => &self.relationships,
            NeedDomain::SelfManagement => &self.self_management,
            NeedDomain::Sexual => &self.sexual,
        }
    }
}

/// One row of the decision table. Absent conditions match anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathwayRule {
    #[serde(default)]
    pub supervision: Option<SupervisionStatus>,
    #[serde(default)]
    pub risk: Option<Level>,
    #[serde(default)]
    pub need: Option<Level>,
    pub pathway: Pathway,
}

impl PathwayRule {
    fn matches(&self, supervision: SupervisionStatus, risk: Level, need: Level) -> bool {
        self.supervision.map_or(true, |expected| expected == supervision)
            && self.risk.map_or(true, |expected| expected == risk)
            && self.need.map_or(true, |expected| expected == need)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathwayParameters {
    pub risk: RiskTriggers,
    pub domains: DomainCutPoints,
    pub high_need_min_domains: usize,
    pub medium_need_min_domains: usize,
    pub rules: Vec<PathwayRule>,
    pub default_pathway: Pathway,
}

impl PathwayParameters {
    pub(crate) fn validate(&self) -> Result<(), String> {
        let risk = &self.risk;
        if !(risk.general.is_ordered()
            && risk.violent.is_ordered()
            && risk.sexual.is_ordered()
            && risk.harm.is_ordered())
        {
            return Err("risk trigger medium threshold exceeds its high threshold".to_string());
        }

        let domains = &self.domains;
        let all_ordered = [
            domains.thinking,
            domains.attitudes,
            domains.relationships,
            domains.self_management,
            domains.sexual,
        ]
        .iter()
        .all(LevelThresholds::is_ordered);
        if !all_ordered {
            return Err("domain medium cut point exceeds its high cut point".to_string());
        }

        if self.high_need_min_domains == 0 || self.medium_need_min_domains == 0 {
            return Err("need level domain counts must be at least 1".to_string());
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainAssessment {
    pub domain: NeedDomain,
    pub score: u32,
    pub level: Level,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathwayOutcome {
    pub pathway: Pathway,
    pub risk_level: Level,
    pub need_level: Level,
    pub domains: Vec<DomainAssessment>,
    /// Delivery should be adapted for identified learning needs.
    pub adapted_delivery: bool,
}

pub fn classify(
    input: &PathwayInput,
    upstream: &UpstreamScores<'_>,
    parameters: &PathwayParameters,
) -> ScoreResult<PathwayOutcome> {
    let required = upstream
        .required(input.sexual_offence_history)
        .map_err(|missing| {
            let names: Vec<&str> = missing.iter().map(|instrument| instrument.name()).collect();
            ValidationErrors::single(
                "upstream",
                format!("missing upstream results: {}", names.join(", ")),
            )
        })?;

    let mut errors = ValidationErrors::new();
    let mut domains = Vec::new();
    for domain in assessed_domains(input.sexual_offence_history) {
        let mut score = 0;
        let mut complete = true;
        for (field, rating) in input.needs.domain(*domain) {
            match rating {
                Some(level) => score += level.magnitude(),
                None => {
                    complete = false;
                    errors.push(field, "required for the pathway need assessment");
                }
            }
        }
        if complete {
            domains.push(DomainAssessment {
                domain: *domain,
                score,
                level: parameters.domains.for_domain(*domain).level(score),
            });
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let risk_level = risk_level(input, upstream, &required, &parameters.risk);
    let need_level = need_level(&domains, parameters);
    let pathway = parameters
        .rules
        .iter()
        .find(|rule| rule.matches(input.supervision_status, risk_level, need_level))
        .map_or(parameters.default_pathway, |rule| rule.pathway);

    Ok(PathwayOutcome {
        pathway,
        risk_level,
        need_level,
        domains,
        adapted_delivery: required.learning_needs.needs_identified,
    })
}

fn assessed_domains(sexual_offence_history: bool) -> &'static [NeedDomain] {
    const GENERAL: &[NeedDomain] = &[
        NeedDomain::Thinking,
        NeedDomain::Attitudes,
        NeedDomain::Relationships,
        NeedDomain::SelfManagement,
    ];
    const WITH_SEXUAL: &[NeedDomain] = &[
        NeedDomain::Thinking,
        NeedDomain::Attitudes,
        NeedDomain::Relationships,
        NeedDomain::SelfManagement,
        NeedDomain::Sexual,
    ];

    if sexual_offence_history {
        WITH_SEXUAL
    } else {
        GENERAL
    }
}

fn risk_level(
    input: &PathwayInput,
    upstream: &UpstreamScores<'_>,
    required: &RequiredUpstream<'_>,
    triggers: &RiskTriggers,
) -> Level {
    let mut level = triggers
        .general
        .level(required.general.two_year_percentage)
        .max(triggers.violent.level(required.violent.two_year_percentage));

    if input.sexual_offence_history {
        let sexual_band = [
            upstream.sexual_contact.map(|score| score.band),
            upstream.sexual_image.map(|score| score.band),
        ]
        .into_iter()
        .flatten()
        .reduce(RiskBand::highest);
        if let Some(band) = sexual_band {
            level = level.max(triggers.sexual.level(band));
        }
    }

    for band in [input.partner_violence_band, input.other_harm_band]
        .into_iter()
        .flatten()
    {
        level = level.max(triggers.harm.level(band));
    }

    level
}

fn need_level(domains: &[DomainAssessment], parameters: &PathwayParameters) -> Level {
    let high = domains
        .iter()
        .filter(|domain| domain.level == Level::High)
        .count();
    let medium_or_above = domains
        .iter()
        .filter(|domain| domain.level >= Level::Medium)
        .count();

    if high >= parameters.high_need_min_domains {
        Level::High
    } else if medium_or_above >= parameters.medium_need_min_domains {
        Level::Medium
    } else {
        Level::Low
    }
}
