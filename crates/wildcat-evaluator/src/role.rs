//! Roles: one decision a player makes, with its own scorer and decision memory.
//!
//! A role is either *tiled* (it picks a site with [`ZoomSearch`], and its scorer sees one
//! tile of cell features) or *direct* (it answers a yes/no question from a short input
//! vector the caller assembles). Both kinds share the same [`RoleConfig`] shape and reward
//! handling; they differ only in whether `tile` is set.

use rand::Rng;
use serde::{Deserialize, Serialize};
use wildcat_engine::{Extent, OilField, Site};

use crate::{
    reward::{DecisionMemory, InvalidMemoryError, RewardOutcome, RewardUpdate},
    scorer::Scorer,
    selection::{SelectionPolicy, argmax},
    site_feature::{
        BoxedSiteFeature, FeatureContext, SiteFeature as _, UnknownFeatureError, site_features,
    },
    zoom_search::{ZoomDecision, ZoomSearch, ZoomSearchError},
};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum RoleError {
    #[display("role `{name}`: {source}")]
    UnknownFeature {
        name: String,
        source: UnknownFeatureError,
    },
    #[display("role `{name}`: {reason}")]
    InvalidShape { name: String, reason: &'static str },
    #[display("role `{name}` has no tile and cannot choose a site")]
    NotTiled { name: String },
    #[display("role `{name}` expects {expected} inputs, got {actual}")]
    InputLength {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[display(
        "role `{name}` needs a {input_count}->{output_count} scorer, got {inputs}->{outputs}"
    )]
    ScorerMismatch {
        name: String,
        input_count: usize,
        output_count: usize,
        inputs: usize,
        outputs: usize,
    },
    #[display("role `{name}`: {source}")]
    Search {
        name: String,
        source: ZoomSearchError,
    },
    #[display("role `{name}`: {source}")]
    Memory {
        name: String,
        source: InvalidMemoryError,
    },
}

/// The fixed shape of a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    name: String,
    input_count: usize,
    output_count: usize,
    tile: Option<Extent>,
    features: Vec<String>,
}

impl RoleConfig {
    /// A site-choosing role whose scorer sees every feature of every tile cell and scores
    /// each cell.
    pub fn tiled<I, F>(name: &str, tile: Extent, features: I) -> Result<Self, RoleError>
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        let features = features.into_iter().map(Into::into).collect::<Vec<_>>();
        Self::new(
            name,
            tile.area() * features.len(),
            tile.area(),
            Some(tile),
            features,
        )
    }

    /// A yes/no role fed with caller-assembled inputs.
    ///
    /// `features` names the site features at the start of the input vector; any further
    /// inputs are context the caller appends.
    pub fn direct<I, F>(
        name: &str,
        input_count: usize,
        output_count: usize,
        features: I,
    ) -> Result<Self, RoleError>
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        let features = features.into_iter().map(Into::into).collect();
        Self::new(name, input_count, output_count, None, features)
    }

    pub fn new(
        name: &str,
        input_count: usize,
        output_count: usize,
        tile: Option<Extent>,
        features: Vec<String>,
    ) -> Result<Self, RoleError> {
        let config = Self {
            name: name.to_owned(),
            input_count,
            output_count,
            tile,
            features,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RoleError> {
        let invalid = |reason| {
            Err(RoleError::InvalidShape {
                name: self.name.clone(),
                reason,
            })
        };
        if self.input_count == 0 || self.output_count == 0 {
            return invalid("input and output counts must be positive");
        }
        match self.tile {
            Some(tile) => {
                if tile.is_empty() || self.features.is_empty() {
                    return invalid("a tiled role needs a non-empty tile and features");
                }
                if self.input_count != tile.area() * self.features.len()
                    || self.output_count != tile.area()
                {
                    return invalid("tile, features and input/output counts disagree");
                }
            }
            None => {
                if self.features.len() > self.input_count {
                    return invalid("more features than inputs");
                }
            }
        }
        self.extractors().map(|_| ())
    }

    fn extractors(&self) -> Result<Vec<BoxedSiteFeature>, RoleError> {
        site_features(&self.features).map_err(|source| RoleError::UnknownFeature {
            name: self.name.clone(),
            source,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    #[must_use]
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    #[must_use]
    pub fn tile(&self) -> Option<Extent> {
        self.tile
    }

    #[must_use]
    pub fn features(&self) -> &[String] {
        &self.features
    }
}

#[derive(Debug)]
pub struct Role<S> {
    config: RoleConfig,
    features: Vec<BoxedSiteFeature>,
    scorer: S,
    policy: SelectionPolicy,
    memory: Option<DecisionMemory>,
}

impl<S> Role<S>
where
    S: Scorer,
{
    pub fn new(config: RoleConfig, scorer: S) -> Result<Self, RoleError> {
        if scorer.input_len() != config.input_count || scorer.output_len() != config.output_count
        {
            return Err(RoleError::ScorerMismatch {
                name: config.name.clone(),
                input_count: config.input_count,
                output_count: config.output_count,
                inputs: scorer.input_len(),
                outputs: scorer.output_len(),
            });
        }
        let features = config.extractors()?;
        Ok(Self {
            config,
            features,
            scorer,
            policy: SelectionPolicy::default(),
            memory: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &RoleConfig {
        &self.config
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[must_use]
    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub fn scorer_mut(&mut self) -> &mut S {
        &mut self.scorer
    }

    #[must_use]
    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: SelectionPolicy) {
        self.policy = policy;
    }

    #[must_use]
    pub fn memory(&self) -> Option<&DecisionMemory> {
        self.memory.as_ref()
    }

    /// Picks a site with zoom search and remembers the final level for the next reward.
    pub fn choose<R>(
        &mut self,
        field: &OilField,
        ctx: &FeatureContext,
        rng: &mut R,
    ) -> Result<ZoomDecision, RoleError>
    where
        R: Rng + ?Sized,
    {
        let tile = self.config.tile.ok_or_else(|| RoleError::NotTiled {
            name: self.config.name.clone(),
        })?;
        let search = ZoomSearch::new(tile, self.policy);
        let decision = search
            .choose(&self.scorer, field, &self.features, ctx, rng)
            .map_err(|source| RoleError::Search {
                name: self.config.name.clone(),
                source,
            })?;
        self.remember(
            decision.inputs.clone(),
            decision.outputs.clone(),
            decision.index,
        )?;
        Ok(decision)
    }

    /// Answers yes (output 0 selected) or no, and remembers the decision.
    pub fn decide<R>(&mut self, inputs: &[f32], rng: &mut R) -> Result<bool, RoleError>
    where
        R: Rng + ?Sized,
    {
        let outputs = self.evaluate(inputs)?;
        let chosen = self.policy.select(&outputs, rng);
        self.remember(inputs.to_vec(), outputs, chosen)?;
        Ok(chosen == 0)
    }

    fn remember(
        &mut self,
        inputs: Vec<f32>,
        outputs: Vec<f32>,
        chosen: usize,
    ) -> Result<(), RoleError> {
        let memory =
            DecisionMemory::new(inputs, outputs, chosen).map_err(|source| RoleError::Memory {
                name: self.config.name.clone(),
                source,
            })?;
        self.memory = Some(memory);
        Ok(())
    }

    pub fn evaluate(&self, inputs: &[f32]) -> Result<Vec<f32>, RoleError> {
        if inputs.len() != self.config.input_count {
            return Err(RoleError::InputLength {
                name: self.config.name.clone(),
                expected: self.config.input_count,
                actual: inputs.len(),
            });
        }
        Ok(self.scorer.evaluate(inputs))
    }

    /// The best output the scorer predicts for `inputs`.
    pub fn estimate(&self, inputs: &[f32]) -> Result<f32, RoleError> {
        let outputs = self.evaluate(inputs)?;
        Ok(outputs[argmax(&outputs)])
    }

    /// This role's features read from a single site, in configuration order.
    #[must_use]
    pub fn site_inputs(&self, site: &Site, ctx: &FeatureContext) -> Vec<f32> {
        self.features.iter().map(|f| f.extract(site, ctx)).collect()
    }

    /// Applies `reward` to the last decision and forgets it.
    pub fn reward(&mut self, update: &RewardUpdate, reward: f32, next_best: f32) -> RewardOutcome {
        match self.memory.take() {
            Some(memory) => update.apply(&mut self.scorer, &memory, reward, next_best),
            None => RewardOutcome::Skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::{region::tests::raw_context, scorer::testing::LinearScorer};

    fn survey_config() -> RoleConfig {
        RoleConfig::tiled("surveying", Extent::new(10, 3), ["prob", "cost"]).unwrap()
    }

    #[test]
    fn test_tiled_config_counts() {
        let config = survey_config();
        assert_eq!(config.input_count(), 60);
        assert_eq!(config.output_count(), 30);
        assert_eq!(config.tile(), Some(Extent::new(10, 3)));
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            RoleConfig::new(
                "x",
                61,
                30,
                Some(Extent::new(10, 3)),
                vec!["prob".into(), "cost".into()]
            ),
            Err(RoleError::InvalidShape { .. })
        ));
        assert!(matches!(
            RoleConfig::direct("x", 2, 2, ["prob", "cost", "tax"]),
            Err(RoleError::InvalidShape { .. })
        ));
        assert!(matches!(
            RoleConfig::direct("x", 0, 2, Vec::<String>::new()),
            Err(RoleError::InvalidShape { .. })
        ));
        assert!(matches!(
            RoleConfig::direct("x", 3, 2, ["prob", "oil"]),
            Err(RoleError::UnknownFeature { .. })
        ));
    }

    #[test]
    fn test_role_rejects_wrong_scorer() {
        let err = Role::new(survey_config(), LinearScorer::new(30, 30)).unwrap_err();
        assert!(matches!(err, RoleError::ScorerMismatch { .. }));
    }

    #[test]
    fn test_choose_records_memory() {
        let mut role = Role::new(survey_config(), LinearScorer::new(60, 30)).unwrap();
        let mut field = OilField::new(80, 24);
        field.site_mut(5, 5).set_probability(50.0);
        let ctx = raw_context(&field);
        let mut rng = Pcg64::seed_from_u64(0);

        assert!(role.memory().is_none());
        let decision = role.choose(&field, &ctx, &mut rng).unwrap();
        let memory = role.memory().unwrap();
        assert_eq!(memory.chosen(), decision.index);
        assert_eq!(memory.inputs().len(), 60);
        assert_eq!(memory.outputs().len(), 30);
        assert!(decision.position.x < 80 && decision.position.y < 24);
    }

    #[test]
    fn test_direct_role_cannot_choose() {
        let config = RoleConfig::direct("drilling", 3, 2, ["prob", "cost", "tax"]).unwrap();
        let mut role = Role::new(config, LinearScorer::new(3, 2)).unwrap();
        let field = OilField::new(20, 6);
        let ctx = raw_context(&field);
        let err = role
            .choose(&field, &ctx, &mut Pcg64::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, RoleError::NotTiled { .. }));
    }

    #[test]
    fn test_decide_and_reward_once() {
        let config = RoleConfig::direct("drilling", 3, 2, ["prob", "cost", "tax"]).unwrap();
        let mut role = Role::new(config, LinearScorer::new(3, 2)).unwrap();
        let mut rng = Pcg64::seed_from_u64(0);
        let update = RewardUpdate::default();

        assert_eq!(role.reward(&update, 1.0, 0.0), RewardOutcome::Skipped);

        let mut site = Site::default();
        site.set_probability(40.0);
        let field = OilField::new(1, 1);
        let ctx = raw_context(&field);
        let inputs = role.site_inputs(&site, &ctx);
        assert_eq!(inputs, [40.0, 0.0, 0.0]);

        let outputs = role.evaluate(&inputs).unwrap();
        let proceed = role.decide(&inputs, &mut rng).unwrap();
        assert_eq!(proceed, outputs[0] >= outputs[1]);
        assert!((role.estimate(&inputs).unwrap() - outputs[0].max(outputs[1])).abs() < 1e-6);

        assert!(role.reward(&update, 1.0, 0.0).is_updated());
        assert_eq!(role.reward(&update, 1.0, 0.0), RewardOutcome::Skipped);
    }

    #[test]
    fn test_wrong_input_length() {
        let config = RoleConfig::direct("sales", 3, 2, ["prob"]).unwrap();
        let mut role = Role::new(config, LinearScorer::new(3, 2)).unwrap();
        let err = role.decide(&[1.0], &mut Pcg64::seed_from_u64(0)).unwrap_err();
        assert!(matches!(
            err,
            RoleError::InputLength {
                expected: 3,
                actual: 1,
                ..
            }
        ));
    }
}
