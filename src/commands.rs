use crate::{OutputMode, emit_success};
use pinstore::config::{self, PinstoreConfig};
use pinstore::restore::{self, Presenter};
use pinstore::ui::{self, Icons, PinTableRow, banner, section, success};
use pinstore::{GroupMenu, Pin, PinStore};
use owo_colors::OwoColorize;
use std::path::PathBuf;

/// Everything a command needs besides its own arguments
pub struct Context {
    pub output_mode: OutputMode,
    pub config: PinstoreConfig,
    pub config_path: PathBuf,
    pub database: PathBuf,
}

impl Context {
    /// Open the one store handle used by this invocation
    pub fn open_store(&self) -> anyhow::Result<PinStore> {
        config::ensure_db_dir(&self.database)?;
        Ok(PinStore::open(&self.database)?)
    }

    pub fn group_menu(&self, store: &PinStore) -> anyhow::Result<GroupMenu> {
        Ok(GroupMenu::new(
            store.all_groups()?,
            self.config.default_label(),
            self.config.unlimited_label(),
        ))
    }

    /// Turn a group label from the command line into a group id
    fn resolve_group(&self, store: &PinStore, label: &str) -> anyhow::Result<Option<i64>> {
        self.group_menu(store)?
            .resolve(label)
            .map(|choice| choice.group_id())
            .ok_or_else(|| anyhow::anyhow!("unknown group '{}' (see `pinstore groups`)", label))
    }
}

/// Attributes of a pin to create
pub struct NewPin {
    pub title: String,
    pub content: String,
    pub visibility: i32,
    pub priority: i32,
    pub color: i64,
    pub persistent: bool,
    pub show_actions: bool,
    pub group: Option<String>,
}

/// Changes to apply to a stored pin
pub struct PinEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub visibility: Option<i32>,
    pub priority: Option<i32>,
    pub color: Option<i64>,
    pub persistent: Option<bool>,
    pub show_actions: Option<bool>,
    pub group: Option<String>,
    pub ungroup: bool,
}

impl PinEdit {
    fn apply(self, ctx: &Context, store: &PinStore, pin: &mut Pin) -> anyhow::Result<()> {
        if let Some(title) = self.title {
            pin.set_title(title)?;
        }
        if let Some(content) = self.content {
            pin.set_content(content);
        }
        if let Some(visibility) = self.visibility {
            pin.set_visibility(visibility);
        }
        if let Some(priority) = self.priority {
            pin.set_priority(priority);
        }
        if let Some(color) = self.color {
            pin.set_color(color)?;
        }
        if let Some(persistent) = self.persistent {
            pin.set_persistent(persistent);
        }
        if let Some(show_actions) = self.show_actions {
            pin.set_show_actions(show_actions);
        }
        if self.ungroup {
            pin.set_group_id(None);
        } else if let Some(label) = self.group {
            pin.set_group_id(ctx.resolve_group(store, &label)?);
        }
        Ok(())
    }
}

pub fn run_add(ctx: &Context, new: NewPin) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let group_id = match new.group.as_deref() {
        Some(label) => ctx.resolve_group(&store, label)?,
        None => None,
    };

    let mut pin = Pin::new(new.title, new.content, new.visibility, new.priority, new.color)?
        .with_persistent(new.persistent)
        .with_show_actions(new.show_actions)
        .with_group(group_id);
    store.save(&mut pin)?;

    if ctx.output_mode.is_human() {
        success(&format!("Pinned #{}: {}", pin.id_or_unset(), pin));
    } else {
        emit_success(ctx.output_mode, "add", serde_json::json!({ "pin": pin }))?;
    }
    Ok(())
}

pub fn run_update(ctx: &Context, id: i64, edit: PinEdit) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let Some(mut pin) = store.all_pins()?.remove(&id) else {
        anyhow::bail!("no pin with id {}", id);
    };

    edit.apply(ctx, &store, &mut pin)?;
    store.save(&mut pin)?;

    if ctx.output_mode.is_human() {
        success(&format!("Updated #{}: {}", id, pin));
    } else {
        emit_success(ctx.output_mode, "update", serde_json::json!({ "pin": pin }))?;
    }
    Ok(())
}

pub fn run_delete(ctx: &Context, id: i64) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let deleted = match store.all_pins()?.remove(&id) {
        Some(mut pin) => {
            store.delete(&mut pin)?;
            true
        }
        None => {
            tracing::info!("No pin with id {}; nothing to delete", id);
            false
        }
    };

    if ctx.output_mode.is_human() {
        if deleted {
            println!("{} Deleted pin #{}", Icons::TRASH, id);
        } else {
            ui::warn(&format!("No pin with id {}", id));
        }
    } else {
        emit_success(ctx.output_mode, "delete", serde_json::json!({ "id": id, "deleted": deleted }))?;
    }
    Ok(())
}

pub fn run_clear(ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let removed = store.delete_all()?;

    if ctx.output_mode.is_human() {
        println!("{} Removed {} pins", Icons::TRASH, removed);
    } else {
        emit_success(ctx.output_mode, "clear", serde_json::json!({ "removed": removed }))?;
    }
    Ok(())
}

pub fn run_count(ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let count = store.count()?;

    if ctx.output_mode.is_human() {
        println!("{}", count);
    } else {
        emit_success(ctx.output_mode, "count", serde_json::json!({ "count": count }))?;
    }
    Ok(())
}

pub fn run_list(ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let menu = ctx.group_menu(&store)?;
    let pins = store.all_pins()?;

    if !ctx.output_mode.is_human() {
        let data: Vec<_> = pins
            .values()
            .map(|pin| {
                serde_json::json!({
                    "pin": pin,
                    "group_label": menu.label_for(pin.group_id()),
                })
            })
            .collect();
        return emit_success(ctx.output_mode, "list", serde_json::Value::Array(data));
    }

    if pins.is_empty() {
        println!("{} No pins stored.", Icons::EMPTY);
        return Ok(());
    }

    let rows: Vec<PinTableRow> = pins
        .values()
        .map(|pin| PinTableRow::new(pin, menu.label_for(pin.group_id()).unwrap_or("?")))
        .collect();
    println!("{}", ui::pins_table(&rows));
    Ok(())
}

pub fn run_groups(ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let menu = ctx.group_menu(&store)?;

    if !ctx.output_mode.is_human() {
        let data: Vec<_> = menu
            .labels()
            .iter()
            .map(|label| {
                serde_json::json!({
                    "label": label,
                    "group_id": menu.resolve(label).and_then(|choice| choice.group_id()),
                })
            })
            .collect();
        return emit_success(ctx.output_mode, "groups", serde_json::Value::Array(data));
    }

    section("Groups");
    for (index, label) in menu.labels().iter().enumerate() {
        let marker = if index == 0 { ui::dim("(no group)") } else { String::new() };
        println!(
            "  {} {} {}",
            Icons::FOLDER,
            label.style(ui::theme().group.clone()),
            marker
        );
    }
    Ok(())
}

/// Prints each restored pin on its own line
struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn present(&mut self, pin: &Pin) -> pinstore::Result<()> {
        println!("{} {}", Icons::PIN, pin.summary());
        Ok(())
    }
}

pub fn run_restore(ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;

    if ctx.output_mode.is_human() {
        let restored = restore::restore_pins(&store, &mut TerminalPresenter)?;
        println!();
        println!("{} Restored {} pins", Icons::RESTORE, restored);
    } else {
        let mut summaries = Vec::new();
        let restored = restore::restore_pins(&store, &mut |pin: &Pin| -> pinstore::Result<()> {
            summaries.push(pin.summary());
            Ok(())
        })?;
        emit_success(
            ctx.output_mode,
            "restore",
            serde_json::json!({ "restored": restored, "pins": summaries }),
        )?;
    }
    Ok(())
}

pub fn run_stats(ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let stats = store.stats()?;

    if ctx.output_mode.is_human() {
        println!("{} Pinstore Statistics", Icons::STATS);
        ui::info("Database", &ctx.database.display().to_string());
        let pins = stats.pins.to_string();
        let groups = stats.groups.to_string();
        let version = stats.schema_version.to_string();
        println!(
            "{}",
            ui::stats_table(&[("Pins", &pins), ("Groups", &groups), ("Schema version", &version)])
        );
    } else {
        emit_success(ctx.output_mode, "stats", serde_json::to_value(&stats)?)?;
    }
    Ok(())
}

pub fn run_init(ctx: &Context, force: bool) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let database = config::default_database_path_in(&cwd);
    let defaults = PinstoreConfig {
        database: Some(database.display().to_string()),
        default_label: Some(ctx.config.default_label().to_string()),
        unlimited_label: Some(ctx.config.unlimited_label().to_string()),
    };
    config::write_config(&ctx.config_path, &defaults, force)?;

    if ctx.output_mode.is_human() {
        success(&format!("Wrote config to {}", ctx.config_path.display()));
        ui::summary_row("database", &database.display().to_string());
    } else {
        emit_success(
            ctx.output_mode,
            "init",
            serde_json::json!({ "config": ctx.config_path.display().to_string(), "settings": defaults }),
        )?;
    }
    Ok(())
}

pub fn run_version(output_mode: OutputMode) -> anyhow::Result<()> {
    if output_mode.is_human() {
        banner(
            &format!("{}", "Pinstore".bold().style(pinstore::ui::theme().info.clone())),
            &format!("Version {} {} database schema v{}", env!("CARGO_PKG_VERSION"), Icons::DATABASE, pinstore::storage::SCHEMA_VERSION)
        );
    } else {
        let data = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "schema_version": pinstore::storage::SCHEMA_VERSION,
        });
        emit_success(output_mode, "version", data)?;
    }
    Ok(())
}
