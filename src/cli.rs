// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, Command, crate_version};

use crate::models::{LoanPurpose, VoteType};
use crate::wire::WireVariant;

fn amount_arg() -> Arg {
    Arg::new("amount").required(true).help("Amount, e.g. 10000 or 2500.50")
}

fn months_arg() -> Arg {
    Arg::new("months")
        .long("months")
        .short('m')
        .required(true)
        .help("Term in months")
}

fn rate_arg(default: Option<&'static str>) -> Arg {
    let a = Arg::new("rate")
        .long("rate")
        .short('r')
        .help("Annual interest rate in percent");
    match default {
        Some(d) => a.default_value(d),
        None => a.required(true),
    }
}

fn id_arg(name: &'static str) -> Arg {
    Arg::new(name).required(true)
}

pub fn build_cli() -> Command {
    Command::new("decofi")
        .version(crate_version!())
        .about("DeCoFi lending toolkit: loan math, canister client, and sandbox")
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print the view-model as JSON"),
        )
        .arg(
            Arg::new("remote")
                .long("remote")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Talk to the canister gateway instead of the local sandbox"),
        )
        .subcommand(
            Command::new("quote")
                .about("Amortized monthly payment for a loan")
                .arg(amount_arg())
                .arg(rate_arg(None))
                .arg(months_arg()),
        )
        .subcommand(
            Command::new("preview")
                .about("Flat-interest estimate shown before a rate is quoted")
                .arg(amount_arg())
                .arg(rate_arg(Some("5")))
                .arg(months_arg()),
        )
        .subcommand(
            Command::new("schedule")
                .about("Month-by-month amortization schedule")
                .arg(amount_arg())
                .arg(rate_arg(None))
                .arg(months_arg()),
        )
        .subcommand(
            Command::new("loan")
                .about("Loans canister")
                .subcommand_required(true)
                .subcommand(
                    Command::new("apply")
                        .about("Apply for a loan")
                        .arg(amount_arg())
                        .arg(months_arg())
                        .arg(
                            Arg::new("purpose")
                                .long("purpose")
                                .short('p')
                                .required(true)
                                .value_parser(PossibleValuesParser::new(
                                    LoanPurpose::TAGS.iter().copied(),
                                )),
                        ),
                )
                .subcommand(Command::new("list").about("Your loans"))
                .subcommand(Command::new("show").about("One loan").arg(id_arg("id")))
                .subcommand(
                    Command::new("pay")
                        .about("Make a payment (defaults to the monthly payment)")
                        .arg(id_arg("id"))
                        .arg(Arg::new("amount").long("amount").short('a')),
                )
                .subcommand(
                    Command::new("payments")
                        .about("Payments made on a loan")
                        .arg(id_arg("id")),
                )
                .subcommand(Command::new("eligibility").about("Maximum eligible loan amount"))
                .subcommand(
                    Command::new("approve")
                        .about("Approve a pending loan")
                        .arg(id_arg("id")),
                )
                .subcommand(
                    Command::new("reject")
                        .about("Reject a pending loan")
                        .arg(id_arg("id")),
                ),
        )
        .subcommand(
            Command::new("wallet")
                .about("Wallet canister")
                .subcommand_required(true)
                .subcommand(Command::new("balance").about("Wallet balance"))
                .subcommand(Command::new("txs").about("Wallet transactions")),
        )
        .subcommand(
            Command::new("gov")
                .about("Governance canister")
                .subcommand_required(true)
                .subcommand(
                    Command::new("proposals").about("Proposals").arg(
                        Arg::new("past")
                            .long("past")
                            .action(ArgAction::SetTrue)
                            .help("Closed proposals instead of active ones"),
                    ),
                )
                .subcommand(
                    Command::new("vote")
                        .about("Vote on a proposal")
                        .arg(id_arg("id"))
                        .arg(
                            Arg::new("choice")
                                .required(true)
                                .value_parser(PossibleValuesParser::new(
                                    VoteType::TAGS.iter().copied(),
                                )),
                        ),
                )
                .subcommand(Command::new("power").about("Your voting power")),
        )
        .subcommand(
            Command::new("advise")
                .about("Savings and investment recommendations for a profile")
                .arg(
                    Arg::new("profile")
                        .long("profile")
                        .required(true)
                        .help("Path to a JSON financial profile"),
                ),
        )
        .subcommand(Command::new("doctor").about("Check loan snapshots for inconsistencies"))
}
