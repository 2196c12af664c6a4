//! The agent: the set of roles a player uses, and their lifecycle on disk.
//!
//! # Lifecycle
//!
//! An agent directory is created once with [`Agent::init`], which builds a freshly
//! initialized network for every standard role and saves it. Later runs restore it with
//! [`Agent::load`], which also checks that each stored network still has the shape its role
//! needs, so a hand-edited or stale `utility.json` fails at load time instead of at the
//! first decision.
//!
//! # Decisions and rewards
//!
//! Each role remembers only its most recent decision. Calling [`Agent::reward`] consumes
//! that memory, so a game loop looks like:
//!
//! ```text
//! let decision = agent.choose("surveying", &field, &ctx, &mut rng)?;
//! // ... play the decision out ...
//! let next_best = agent.estimate("report", &agent.report_inputs(site, &ctx)?)?;
//! agent.reward("surveying", reward, next_best)?;
//! agent.save()?;
//! ```
//!
//! Rewarding a role twice without a new decision in between is a no-op
//! ([`RewardOutcome::Skipped`]).
//!
//! # Training
//!
//! [`Agent::train`] pre-fits one role from the corpus files in `<agent>/<role>/training/`.
//! It only updates the in-memory network; call [`Agent::save`] to persist the result.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use chrono::Utc;
use rand::Rng;
use tracing::info;
use wildcat_engine::{OilField, Site};
use wildcat_evaluator::{
    reward::{RewardOutcome, RewardUpdate},
    role::{Role, RoleConfig},
    selection::SelectionPolicy,
    site_feature::FeatureContext,
    zoom_search::ZoomDecision,
};
use wildcat_training::{
    corpus::Corpus,
    network::FeedForwardNet,
    supervised::{Trainer, TrainingReport},
};

use crate::{
    AgentError, roles,
    storage::{self, StoredScorer},
};

/// A player: one role per decision, each with its own persisted scorer.
#[derive(Debug)]
pub struct Agent {
    dir: PathBuf,
    roles: BTreeMap<String, Role<FeedForwardNet>>,
    reward_update: RewardUpdate,
}

impl Agent {
    /// Creates fresh scorers for every standard role and saves them under `dir`.
    ///
    /// Missing directories are created; existing weights are overwritten.
    pub fn init<R>(dir: &Path, rng: &mut R) -> Result<Self, AgentError>
    where
        R: Rng + ?Sized,
    {
        let mut agent = Self::empty(dir);
        for config in roles::standard_roles()? {
            storage::create_role_dirs(dir, config.name())?;
            let network =
                FeedForwardNet::with_hidden_layer(config.input_count(), config.output_count(), rng)
                    .map_err(|source| AgentError::Network {
                        role: config.name().to_owned(),
                        source,
                    })?;
            agent.insert(config, network)?;
        }
        agent.save()?;
        info!(dir = %dir.display(), roles = agent.roles.len(), "initialized agent");
        Ok(agent)
    }

    /// Restores every standard role from `dir`.
    pub fn load(dir: &Path) -> Result<Self, AgentError> {
        let mut agent = Self::empty(dir);
        for config in roles::standard_roles()? {
            let stored = storage::read(dir, config.name())?;
            stored
                .network
                .validate()
                .map_err(|source| AgentError::Network {
                    role: config.name().to_owned(),
                    source,
                })?;
            agent.insert(config, stored.network)?;
        }
        info!(dir = %dir.display(), "loaded agent");
        Ok(agent)
    }

    fn empty(dir: &Path) -> Self {
        Self {
            dir: dir.to_owned(),
            roles: BTreeMap::new(),
            reward_update: RewardUpdate::default(),
        }
    }

    fn insert(&mut self, config: RoleConfig, network: FeedForwardNet) -> Result<(), AgentError> {
        let role = Role::new(config, network)?;
        self.roles.insert(role.name().to_owned(), role);
        Ok(())
    }

    pub fn save(&self) -> Result<(), AgentError> {
        let saved_at = Utc::now();
        for (name, role) in &self.roles {
            storage::create_role_dirs(&self.dir, name)?;
            let stored = StoredScorer {
                role: name.clone(),
                saved_at,
                network: role.scorer().clone(),
            };
            storage::write(&storage::weights_path(&self.dir, name), &stored)?;
        }
        info!(dir = %self.dir.display(), "saved agent");
        Ok(())
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn roles(&self) -> impl Iterator<Item = &Role<FeedForwardNet>> {
        self.roles.values()
    }

    pub fn role(&self, name: &str) -> Result<&Role<FeedForwardNet>, AgentError> {
        self.roles.get(name).ok_or_else(|| AgentError::UnknownRole {
            name: name.to_owned(),
        })
    }

    pub fn role_mut(&mut self, name: &str) -> Result<&mut Role<FeedForwardNet>, AgentError> {
        self.roles
            .get_mut(name)
            .ok_or_else(|| AgentError::UnknownRole {
                name: name.to_owned(),
            })
    }

    #[must_use]
    pub fn reward_update(&self) -> RewardUpdate {
        self.reward_update
    }

    pub fn set_reward_update(&mut self, update: RewardUpdate) {
        self.reward_update = update;
    }

    pub fn set_policy(&mut self, role: &str, policy: SelectionPolicy) -> Result<(), AgentError> {
        self.role_mut(role)?.set_policy(policy);
        Ok(())
    }

    pub fn choose<R>(
        &mut self,
        role: &str,
        field: &OilField,
        ctx: &FeatureContext,
        rng: &mut R,
    ) -> Result<ZoomDecision, AgentError>
    where
        R: Rng + ?Sized,
    {
        Ok(self.role_mut(role)?.choose(field, ctx, rng)?)
    }

    pub fn decide<R>(&mut self, role: &str, inputs: &[f32], rng: &mut R) -> Result<bool, AgentError>
    where
        R: Rng + ?Sized,
    {
        Ok(self.role_mut(role)?.decide(inputs, rng)?)
    }

    pub fn estimate(&self, role: &str, inputs: &[f32]) -> Result<f32, AgentError> {
        Ok(self.role(role)?.estimate(inputs)?)
    }

    /// Feeds `reward` back into the role's last decision.
    pub fn reward(
        &mut self,
        role: &str,
        reward: f32,
        next_best: f32,
    ) -> Result<RewardOutcome, AgentError> {
        let update = self.reward_update;
        Ok(self.role_mut(role)?.reward(&update, reward, next_best))
    }

    /// Inputs of the `report` role for one site: its features followed by the oil price.
    pub fn report_inputs(&self, site: &Site, ctx: &FeatureContext) -> Result<Vec<f32>, AgentError> {
        let mut inputs = self.role(roles::REPORT)?.site_inputs(site, ctx);
        inputs.push(ctx.normalized_oil_price());
        Ok(inputs)
    }

    #[must_use]
    pub fn training_dir(&self, role: &str) -> PathBuf {
        storage::training_dir(&self.dir, role)
    }

    /// Fits a role's scorer to every corpus file in its training directory.
    pub fn train<R>(
        &mut self,
        role: &str,
        trainer: &Trainer,
        delimiter: Option<char>,
        rng: &mut R,
    ) -> Result<TrainingReport, AgentError>
    where
        R: Rng + ?Sized,
    {
        let training_dir = self.training_dir(role);
        let target = self.role_mut(role)?;
        let config = target.config();
        let corpus = Corpus::read_dir(
            &training_dir,
            delimiter,
            config.input_count(),
            config.output_count(),
        )?;
        info!(role, samples = corpus.len(), "training from corpus");
        trainer
            .train(target.scorer_mut(), &corpus, rng)
            .map_err(|source| AgentError::Training {
                role: role.to_owned(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, io::Write as _};

    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;
    use wildcat_engine::{FieldGenerator, Theme};
    use wildcat_evaluator::scorer::Scorer as _;

    use super::*;

    #[test]
    fn test_init_creates_role_directories() {
        let dir = tempfile::tempdir().unwrap();
        let agent_dir = dir.path().join("bud");
        let agent = Agent::init(&agent_dir, &mut Pcg64::seed_from_u64(0)).unwrap();

        for name in [roles::SURVEYING, roles::REPORT, roles::DRILLING, roles::SALES] {
            assert!(storage::training_dir(&agent_dir, name).is_dir());
            assert!(storage::weights_path(&agent_dir, name).is_file());
        }
        assert_eq!(agent.roles().count(), 4);
    }

    #[test]
    fn test_load_restores_saved_scorers() {
        let dir = tempfile::tempdir().unwrap();
        let agent = Agent::init(dir.path(), &mut Pcg64::seed_from_u64(1)).unwrap();
        let loaded = Agent::load(dir.path()).unwrap();

        let inputs = [0.2, 0.4, 0.6, 0.8];
        let before = agent.role(roles::REPORT).unwrap().scorer().evaluate(&inputs);
        let after = loaded.role(roles::REPORT).unwrap().scorer().evaluate(&inputs);
        for (a, b) in before.iter().zip(&after) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_load_without_weights_fails() {
        let dir = tempfile::tempdir().unwrap();
        Agent::init(dir.path(), &mut Pcg64::seed_from_u64(2)).unwrap();
        fs::remove_file(storage::weights_path(dir.path(), roles::SALES)).unwrap();

        let err = Agent::load(dir.path()).unwrap_err();
        assert!(matches!(err, AgentError::MissingWeights { role, .. } if role == roles::SALES));
    }

    #[test]
    fn test_unknown_role_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut agent = Agent::init(dir.path(), &mut Pcg64::seed_from_u64(3)).unwrap();
        let err = agent.reward("wildcatting", 1.0, 0.0).unwrap_err();
        assert!(matches!(err, AgentError::UnknownRole { .. }));
    }

    #[test]
    fn test_choose_then_reward_updates_surveying() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = Pcg64::seed_from_u64(4);
        let mut agent = Agent::init(dir.path(), &mut rng).unwrap();

        let theme = Theme::default();
        let field = FieldGenerator::new(&theme)
            .unwrap()
            .generate(80, 24, &mut rng);
        let ctx = FeatureContext::new(&theme, theme.initial_oil_price(), field.site_count(), true)
            .unwrap();

        assert_eq!(
            agent.reward(roles::SURVEYING, 1.0, 0.0).unwrap(),
            RewardOutcome::Skipped
        );

        let decision = agent
            .choose(roles::SURVEYING, &field, &ctx, &mut rng)
            .unwrap();
        assert!(decision.position.x < 80 && decision.position.y < 24);

        let site = field.get(decision.position).unwrap();
        let inputs = agent.report_inputs(site, &ctx).unwrap();
        assert_eq!(inputs.len(), 4);
        let next_best = agent.estimate(roles::REPORT, &inputs).unwrap();

        let outcome = agent.reward(roles::SURVEYING, 0.5, next_best).unwrap();
        assert!(outcome.is_updated());

        agent.save().unwrap();
        Agent::load(dir.path()).unwrap();
    }

    #[test]
    fn test_decide_on_direct_role() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = Pcg64::seed_from_u64(5);
        let mut agent = Agent::init(dir.path(), &mut rng).unwrap();

        agent.decide(roles::DRILLING, &[0.3, 0.1, 0.5], &mut rng).unwrap();
        assert!(agent.role(roles::DRILLING).unwrap().memory().is_some());
        assert!(agent.decide(roles::DRILLING, &[0.3], &mut rng).is_err());
    }

    #[test]
    fn test_train_reads_training_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = Pcg64::seed_from_u64(6);
        let mut agent = Agent::init(dir.path(), &mut rng).unwrap();

        let path = agent.training_dir(roles::SALES).join("sales.dat");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "INCOME TAX AGE SELL KEEP").unwrap();
        writeln!(file, "0.9 0.1 0.2 0.8 -0.8").unwrap();
        writeln!(file, "0.1 0.9 0.7 -0.8 0.8").unwrap();
        drop(file);

        let trainer = Trainer {
            epochs: 200,
            show: 0,
            goal: 0.0,
            learning_rate: 0.1,
        };
        let report = agent
            .train(roles::SALES, &trainer, None, &mut rng)
            .unwrap();
        assert_eq!(report.epochs_run, 200);
        assert!(report.final_error().unwrap() < report.errors[0]);
    }

    #[test]
    fn test_train_with_empty_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut rng = Pcg64::seed_from_u64(7);
        let mut agent = Agent::init(dir.path(), &mut rng).unwrap();
        let err = agent
            .train(roles::SALES, &Trainer::default(), None, &mut rng)
            .unwrap_err();
        assert!(matches!(err, AgentError::Training { .. }));
    }
}
