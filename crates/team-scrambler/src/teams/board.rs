use super::assign::assign_with_rng;
use super::domain::{
    next_tag, CategoricalField, Group, GroupId, Individual, IndividualId, SizingConfig,
};
use super::metrics::compute_distributions;
use super::quality::{score, QualityReport};
use rand::Rng;
use tracing::debug;

/// The current set of groups together with the field metadata used to build
/// them. Every membership edit goes through the board so each group's metrics
/// stay in step with its members.
#[derive(Debug, Clone)]
pub struct TeamBoard {
    groups: Vec<Group>,
    fields: Vec<CategoricalField>,
    balance_fields: Vec<String>,
}

impl TeamBoard {
    /// Wraps existing groups, recomputing their metrics for `balance_fields`.
    pub fn new(
        mut groups: Vec<Group>,
        fields: Vec<CategoricalField>,
        balance_fields: Vec<String>,
    ) -> Self {
        for group in &mut groups {
            group.metrics = compute_distributions(&group.members, &fields, &balance_fields);
        }

        Self {
            groups,
            fields,
            balance_fields,
        }
    }

    pub fn scramble(
        individuals: &[Individual],
        fields: Vec<CategoricalField>,
        config: &SizingConfig,
    ) -> Self {
        Self::scramble_with_rng(individuals, fields, config, &mut rand::thread_rng())
    }

    pub fn scramble_with_rng<R: Rng + ?Sized>(
        individuals: &[Individual],
        fields: Vec<CategoricalField>,
        config: &SizingConfig,
        rng: &mut R,
    ) -> Self {
        let groups = assign_with_rng(individuals, &fields, config, rng);
        Self {
            groups,
            fields,
            balance_fields: config.balance_fields.clone(),
        }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn fields(&self) -> &[CategoricalField] {
        &self.fields
    }

    pub fn balance_fields(&self) -> &[String] {
        &self.balance_fields
    }

    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|group| &group.id == id)
    }

    pub fn quality(&self) -> QualityReport {
        score(&self.groups, &self.balance_fields, &self.fields)
    }

    pub fn rename(&mut self, id: &GroupId, name: impl Into<String>) -> Result<(), BoardError> {
        let idx = self.index_of(id)?;
        self.groups[idx].name = name.into();
        Ok(())
    }

    /// Advances the group's tag to the next palette entry and returns it.
    pub fn cycle_tag(&mut self, id: &GroupId) -> Result<&str, BoardError> {
        let idx = self.index_of(id)?;
        let group = &mut self.groups[idx];
        group.tag = next_tag(&group.tag).to_string();
        Ok(&group.tag)
    }

    /// Moves a member to the end of another group.
    pub fn move_member(
        &mut self,
        member: &IndividualId,
        from: &GroupId,
        to: &GroupId,
    ) -> Result<(), BoardError> {
        let from_idx = self.index_of(from)?;
        let to_idx = self.index_of(to)?;
        if from_idx == to_idx {
            return Err(BoardError::SameGroup(from.clone()));
        }

        let moved = self.take_member(from_idx, member)?;
        self.groups[to_idx].members.push(moved);
        self.refresh(to_idx);

        debug!(member = %member, from = %from, to = %to, "moved member");
        Ok(())
    }

    pub fn remove_member(
        &mut self,
        group: &GroupId,
        member: &IndividualId,
    ) -> Result<Individual, BoardError> {
        let idx = self.index_of(group)?;
        self.take_member(idx, member)
    }

    pub fn add_member(&mut self, group: &GroupId, member: Individual) -> Result<(), BoardError> {
        let idx = self.index_of(group)?;
        self.groups[idx].members.push(member);
        self.refresh(idx);
        Ok(())
    }

    fn take_member(&mut self, idx: usize, member: &IndividualId) -> Result<Individual, BoardError> {
        let group = &mut self.groups[idx];
        let position = group
            .members
            .iter()
            .position(|candidate| &candidate.id == member)
            .ok_or_else(|| BoardError::MemberNotFound {
                member: member.clone(),
                group: group.id.clone(),
            })?;
        let removed = group.members.remove(position);
        self.refresh(idx);
        Ok(removed)
    }

    fn refresh(&mut self, idx: usize) {
        let group = &mut self.groups[idx];
        group.metrics = compute_distributions(&group.members, &self.fields, &self.balance_fields);
    }

    fn index_of(&self, id: &GroupId) -> Result<usize, BoardError> {
        self.groups
            .iter()
            .position(|group| &group.id == id)
            .ok_or_else(|| BoardError::GroupNotFound(id.clone()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("group {0} not found")]
    GroupNotFound(GroupId),
    #[error("member {member} is not in group {group}")]
    MemberNotFound { member: IndividualId, group: GroupId },
    #[error("member is already in group {0}")]
    SameGroup(GroupId),
}
