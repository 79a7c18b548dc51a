// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use serde_json::Value;

use super::arg;
use crate::client::{CanisterTransport, GovernanceClient};
use crate::models::{Proposal, VoteType};
use crate::utils::{maybe_print_json, pretty_table};
use crate::wire::WireVariant;

pub fn handle(transport: &dyn CanisterTransport, m: &clap::ArgMatches, json: bool) -> Result<()> {
    let client = GovernanceClient::new(transport);
    match m.subcommand() {
        Some(("proposals", sub)) => {
            let list = if sub.get_flag("past") {
                client.get_past_proposals()?
            } else {
                client.get_active_proposals()?
            };
            print_proposals(&list, json)?;
        }
        Some(("vote", sub)) => {
            let id = arg(sub, "id")?;
            let choice = arg(sub, "choice")?;
            let vote_type =
                VoteType::from_tag(choice).ok_or_else(|| anyhow!("Unknown vote '{}'", choice))?;
            let vote = client.vote(id, vote_type)?;
            if !maybe_print_json(json, &vote.to_view())? {
                println!(
                    "Voted {} on {} with power {}",
                    vote.vote_type, vote.proposal_id, vote.voting_power
                );
            }
        }
        Some(("power", _)) => {
            let power = client.get_user_voting_power()?;
            if !maybe_print_json(json, &serde_json::json!({ "voting_power": power.to_string() }))? {
                println!("Voting power: {}", power);
            }
        }
        _ => {}
    }
    Ok(())
}

fn print_proposals(list: &[Proposal], json: bool) -> Result<()> {
    let views: Vec<Value> = list.iter().map(Proposal::to_view).collect();
    if maybe_print_json(json, &views)? {
        return Ok(());
    }
    let rows = list
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                p.title.clone(),
                p.category.clone(),
                p.status.to_string(),
                p.votes_for.to_string(),
                p.votes_against.to_string(),
                p.deadline.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Title", "Category", "Status", "For", "Against", "Deadline"], rows)
    );
    Ok(())
}
