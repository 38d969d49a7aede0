//! Notification command handlers

use crate::args::NotificationsSubcommand;
use crate::commands::{short_date, CommandResult};
use campus_records::core::models::Notification;
use campus_records::core::notifications::{NotificationFeed, PAGE_SIZE};
use campus_records::core::session::AppState;

/// Dispatch notification subcommands
pub async fn run(subcommand: Option<NotificationsSubcommand>, state: &AppState) -> CommandResult {
    let profile = state.require_profile()?;
    let mut feed = NotificationFeed::new(state.gateway().clone(), &profile.id);

    match subcommand {
        None => {
            feed.load().await?;
            print_feed(&feed);
        }
        Some(NotificationsSubcommand::List { limit }) => {
            feed.load_limit(limit).await?;
            print_feed(&feed);
        }
        Some(NotificationsSubcommand::Read { id }) => {
            feed.load().await?;
            let marked = feed.mark_read(&id).await?;
            let loaded = feed.page().iter().find(|n| n.id == id);
            println!("{}", read_message(&id, marked, loaded));
        }
        Some(NotificationsSubcommand::ReadAll) => {
            feed.load().await?;
            let marked = feed.mark_all_read().await?;
            println!("✓ Marked {marked} notifications as read");
        }
    }
    Ok(())
}

/// Outcome line for `notifications read`; a no-op is informational
fn read_message(id: &str, marked: bool, loaded: Option<&Notification>) -> String {
    match (marked, loaded) {
        (true, _) => format!("✓ Marked {id} as read"),
        (false, Some(_)) => format!("ℹ {id} is already read"),
        (false, None) => format!("ℹ {id} is not among your latest {PAGE_SIZE} notifications"),
    }
}

fn print_feed(feed: &NotificationFeed) {
    let badge = feed.badge().map_or_else(String::new, |b| format!(" [{b}]"));
    println!("\n=== Notifications{badge} ===\n");
    if feed.page().is_empty() {
        println!("No notifications.");
    }
    feed.page().iter().for_each(print_notification);
}

fn print_notification(notification: &Notification) {
    let marker = if notification.is_unread() { "●" } else { " " };
    println!(
        "{marker} {:<10} {} [{}] {}",
        notification.id,
        short_date(notification.created_at),
        notification.category().label(),
        notification.title
    );
    println!("    {}", notification.message);
}
