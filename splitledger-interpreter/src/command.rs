use splitledger_application::GroupSummary;
use splitledger_domain::{GroupId, Money, UserBalances, UserId};
use std::{borrow::Cow, fmt::Write as _};

pub const USAGE: &str = "Usage: splitledger <snapshot.json> (group <group-id> | pair <user-id> <friend-id> | user <user-id>)";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Group(GroupId),
    Pair { user: UserId, friend: UserId },
    User(UserId),
}

#[derive(Debug, PartialEq, Eq)]
pub struct Invocation {
    pub snapshot_path: String,
    pub command: Command,
}

impl Invocation {
    /// Parses the arguments after the program name.
    pub fn parse<I>(args: I) -> Result<Self, Cow<'static, str>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let Some(snapshot_path) = args.next() else {
            return Err(USAGE.into());
        };
        let Some(verb) = args.next() else {
            return Err(USAGE.into());
        };
        let operands: Vec<String> = args.collect();

        let command = match (verb.as_str(), operands.as_slice()) {
            ("group", [group]) => Command::Group(GroupId::from(group.as_str())),
            ("pair", [user, friend]) => Command::Pair {
                user: UserId::from(user.as_str()),
                friend: UserId::from(friend.as_str()),
            },
            ("user", [user]) => Command::User(UserId::from(user.as_str())),
            ("group" | "pair" | "user", _) => {
                return Err(format!("Wrong number of arguments for `{verb}`\n{USAGE}").into());
            }
            _ => return Err(format!("Unknown command `{verb}`\n{USAGE}").into()),
        };

        Ok(Self {
            snapshot_path,
            command,
        })
    }
}

pub fn format_group_summary(summary: &GroupSummary) -> String {
    let mut out = format!("Group {}\n", summary.group_id);
    out.push_str("Balances:\n");
    push_balances(&mut out, &summary.balances);
    if !summary.former_members.is_empty() {
        out.push_str("Former members:\n");
        push_balances(&mut out, &summary.former_members);
    }
    if summary.transfers.is_empty() {
        out.push_str("Settled up\n");
    } else {
        out.push_str("Transfers:\n");
        for transfer in &summary.transfers {
            let _ = writeln!(
                out,
                "  {} -> {}: {}",
                transfer.from, transfer.to, transfer.amount
            );
        }
    }
    out
}

pub fn format_pair(user: &UserId, friend: &UserId, balance: Money) -> String {
    if balance.is_positive() {
        format!("{friend} owes {user} {balance}")
    } else if balance.is_negative() {
        format!("{user} owes {friend} {}", balance.abs())
    } else {
        format!("{user} and {friend} are settled up")
    }
}

pub fn format_counterparts(user: &UserId, balances: &UserBalances) -> String {
    let mut out = format!("Balances of {user}\n");
    if balances.is_empty() {
        out.push_str("  (no shared expenses)\n");
    } else {
        push_balances(&mut out, balances);
    }
    out
}

fn push_balances(out: &mut String, balances: &UserBalances) {
    for (user, balance) in balances {
        let _ = writeln!(out, "  {user}: {balance}");
    }
}
