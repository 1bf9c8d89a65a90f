use splitledger_domain::{GroupId, PairwiseAccounting, Transfer, UserBalances};

/// What a group query does when users outside the current membership still
/// hold a balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResidualPolicy {
    /// Refuse to settle until the residuals are cleared.
    #[default]
    Reject,
    /// Settle members and residual holders together.
    IncludeFormerMembers,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedgerConfig {
    pub pairwise_accounting: PairwiseAccounting,
    pub residual_policy: ResidualPolicy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupSummary {
    pub group_id: GroupId,
    /// Net position of each current member, in membership order.
    pub balances: UserBalances,
    pub former_members: UserBalances,
    pub transfers: Vec<Transfer>,
}
