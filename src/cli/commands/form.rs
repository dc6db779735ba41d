//! `uniform-request form` command - the interactive request form
//!
//! Each pass of the loop re-evaluates the whole form, shows it as a menu and
//! applies the one action the user picks. The add and submit buttons are
//! only offered once every field is valid.

use chrono::Local;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{
    load_config, load_master, print_success, print_warning, require_terminal, save_export,
    truncate_str,
};
use crate::cli::GlobalOpts;
use crate::core::export::{summary_table, QUANTITY_LABEL, USER_NAME_LABEL};
use crate::core::{
    Action, Config, Export, Field, Form, Outcome, PendingSelection, Phase, Session, PLACEHOLDER,
};

const VALUE_WIDTH: usize = 32;

/// One line of the form menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Pick(Field),
    Quantity,
    UserName,
    Add,
    Submit,
    Quit,
}

pub fn run(global: &GlobalOpts) -> Result<()> {
    require_terminal("form")?;

    let config = load_config(global)?;
    let master = load_master(&config)?;
    let form = Form::new(&master, config.quantity);
    let theme = ColorfulTheme::default();

    let mut session = Session::new();
    let mut pending = PendingSelection::new();

    println!("{}", style("👔 制服申請フォーム").bold());

    loop {
        let keep_going = match session.phase() {
            Phase::Collecting => collect(&mut session, &mut pending, &form, &theme)?,
            Phase::Reviewing => review(&mut session, &mut pending, &config, &theme)?,
        };
        if !keep_going {
            break;
        }
    }

    Ok(())
}

/// One pass over the form while collecting; returns false to quit
fn collect(
    session: &mut Session,
    pending: &mut PendingSelection,
    form: &Form<'_>,
    theme: &ColorfulTheme,
) -> Result<bool> {
    form.reconcile(pending);

    if !session.entries().is_empty() {
        println!();
        println!("{}", style("📝 現在の入力内容").bold());
        println!("{}", summary_table(session.entries()));
    }

    let check = form.check(pending);
    if let Some(warning) = check.warning {
        print_warning(&warning.to_string());
    }

    let mut items: Vec<MenuItem> = Field::all().iter().map(|f| MenuItem::Pick(*f)).collect();
    items.push(MenuItem::Quantity);
    items.push(MenuItem::UserName);
    if check.all_fields_filled {
        items.push(MenuItem::Add);
        items.push(MenuItem::Submit);
    }
    items.push(MenuItem::Quit);

    let labels: Vec<String> = items.iter().map(|item| menu_label(*item, pending)).collect();
    let choice = Select::with_theme(theme)
        .with_prompt("項目を選択")
        .items(&labels)
        .default(0)
        .interact()
        .into_diagnostic()?;

    let action = match items[choice] {
        MenuItem::Pick(field) => {
            let options = form.options(field, pending);
            let current = pending
                .get(field)
                .and_then(|v| options.iter().position(|o| o == v))
                .unwrap_or(0);
            let picked = Select::with_theme(theme)
                .with_prompt(field.label())
                .items(&options)
                .default(current)
                .interact()
                .into_diagnostic()?;
            Action::Select {
                field,
                value: Some(options[picked].clone()),
            }
        }
        MenuItem::Quantity => Action::SetQuantity(prompt_text(
            theme,
            QUANTITY_LABEL,
            &pending.quantity_raw,
        )?),
        MenuItem::UserName => Action::SetUserName(prompt_text(
            theme,
            USER_NAME_LABEL,
            &pending.user_name_raw,
        )?),
        MenuItem::Add => Action::Append,
        MenuItem::Submit => Action::Finalize,
        MenuItem::Quit => return confirm_quit(session, theme),
    };

    match session.apply(pending, action, form) {
        Outcome::Appended { count } => {
            print_success(&format!("追加しました（現在 {} 件）", count));
        }
        Outcome::Ignored(reason) => print_warning(&reason.to_string()),
        Outcome::Updated { .. } | Outcome::Finalized { .. } | Outcome::Reset => {}
    }

    Ok(true)
}

/// Show the submitted request and offer a fresh start; returns false to quit
fn review(
    session: &mut Session,
    pending: &mut PendingSelection,
    config: &Config,
    theme: &ColorfulTheme,
) -> Result<bool> {
    let at = session.finalized_at().unwrap_or_else(Local::now);
    let export = Export::render(session.entries(), at)?;

    println!();
    print_success("送信完了。ありがとうございました");
    println!();
    println!("{}", style("📋 申請内容").bold());
    println!("{}", export.table);
    println!();
    println!("{}", style("📝 テキスト形式").bold());
    println!("{}", export.text);
    println!();
    if let Some(path) = save_export(&export, &config.export_dir) {
        println!("{} {}", style("📥 CSV:").bold(), style(path.display()).cyan());
        println!();
    }

    let restart = Select::with_theme(theme)
        .with_prompt("次の操作")
        .items(&["🔄 新しい申請を開始", "終了"])
        .default(0)
        .interact()
        .into_diagnostic()?;

    if restart == 0 {
        session.reset(pending)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

fn prompt_text(theme: &ColorfulTheme, label: &str, current: &str) -> Result<String> {
    Input::<String>::with_theme(theme)
        .with_prompt(label)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()
}

fn confirm_quit(session: &Session, theme: &ColorfulTheme) -> Result<bool> {
    if session.entries().is_empty() {
        return Ok(false);
    }

    let discard = Confirm::with_theme(theme)
        .with_prompt(format!(
            "{} 件の未送信データを破棄して終了しますか？",
            session.entries().len()
        ))
        .default(false)
        .interact()
        .into_diagnostic()?;

    Ok(!discard)
}

fn menu_label(item: MenuItem, pending: &PendingSelection) -> String {
    match item {
        MenuItem::Pick(field) => format!(
            "{}: {}",
            field.label(),
            truncate_str(pending.get(field).unwrap_or(PLACEHOLDER), VALUE_WIDTH)
        ),
        MenuItem::Quantity => format!(
            "{}: {}",
            QUANTITY_LABEL,
            truncate_str(&pending.quantity_raw, VALUE_WIDTH)
        ),
        MenuItem::UserName => format!(
            "{}: {}",
            USER_NAME_LABEL,
            truncate_str(&pending.user_name_raw, VALUE_WIDTH)
        ),
        MenuItem::Add => "➕ 続けて入力".to_string(),
        MenuItem::Submit => "✅ 入力終了して送信".to_string(),
        MenuItem::Quit => "終了".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_label_shows_placeholder_when_unset() {
        let pending = PendingSelection::new();
        assert_eq!(
            menu_label(MenuItem::Pick(Field::Pattern), &pending),
            format!("制服パターン: {}", PLACEHOLDER)
        );
    }

    #[test]
    fn test_menu_label_shows_values() {
        let mut pending = PendingSelection::prefilled(Some("Tanaka".into()));
        pending.set_quantity("２");
        assert_eq!(menu_label(MenuItem::Pick(Field::Applicant), &pending), "起票: Tanaka");
        assert_eq!(menu_label(MenuItem::Quantity, &pending), "個数: ２");
    }
}
