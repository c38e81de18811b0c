use clap::Subcommand;
use pomoquest_core::Event;

use super::{open_session, print_event, CmdResult};

#[derive(Subcommand)]
pub enum ShopAction {
    /// Buy an item for the given number of coins
    Buy {
        /// Item price in coins
        cost: u64,
        /// Item name shown in the receipt
        #[arg(long)]
        item: Option<String>,
    },
    /// Show the coin balance
    Balance,
}

pub fn run(action: ShopAction) -> CmdResult {
    let (mut session, _config) = open_session()?;

    match action {
        ShopAction::Buy { cost, item } => {
            let event = session.purchase(cost);
            print_event(&event)?;
            match event {
                Event::CoinsSpent { .. } => {
                    if let Some(item) = item {
                        eprintln!("Purchased: {item}");
                    }
                }
                Event::InsufficientFunds { .. } => return Err("Not enough coins.".into()),
                _ => {}
            }
        }
        ShopAction::Balance => {
            println!("{}", session.ledger().coins());
        }
    }
    Ok(())
}
