use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::browse::open;
use crate::cli::{
    AdminCommand, ApplyJsonArgs, BookAddArgs, BookCommand, CategoryCommand, GistCommand,
    PromoCommand,
};
use crate::editor::{BookEdit, NewBook, NewPromotion, SettingsEditor};
use crate::gist::{GistClient, GistConfig};

pub async fn run(data_dir: &Path, command: AdminCommand) -> anyhow::Result<()> {
    let (store, storage) = open(data_dir).await?;
    let mut editor = SettingsEditor::new(&store.get())?;

    match command {
        AdminCommand::Show => {
            println!("{}", editor.export_json()?);
            return Ok(());
        }
        AdminCommand::Export(args) => {
            editor
                .export_to(&PathBuf::from(&args.out), args.force)
                .await?;
            println!("{}", args.out);
            return Ok(());
        }
        AdminCommand::Import(args) => {
            editor.import_from(&PathBuf::from(args.file)).await?;
        }
        AdminCommand::Set(args) => {
            editor.set_field(args.field, &args.value)?;
        }
        AdminCommand::Category { command } => match command {
            CategoryCommand::Add { title, emoji } => {
                let id = editor.add_category(&title, &emoji)?;
                println!("{id}");
            }
            CategoryCommand::Delete { id, confirm } => {
                editor.delete_category(&id, confirm.yes)?;
            }
        },
        AdminCommand::Book { command } => match command {
            BookCommand::Add(args) => {
                let id = editor.add_book(new_book(args).await?)?;
                println!("{id}");
            }
            BookCommand::Edit(args) => {
                let edit = BookEdit {
                    title: args.title,
                    author: args.author,
                    cover_color: args.cover,
                };
                editor.edit_book(&args.category, &args.id, edit)?;
            }
            BookCommand::Delete {
                category,
                id,
                confirm,
            } => {
                editor.delete_book(&category, &id, confirm.yes)?;
            }
        },
        AdminCommand::Promo { command } => match command {
            PromoCommand::Add {
                title,
                image,
                link,
                description,
            } => {
                let id = editor.add_promotion(NewPromotion {
                    title,
                    image_url: image,
                    link_url: link,
                    description,
                })?;
                println!("{id}");
            }
            PromoCommand::Delete { id } => {
                editor.delete_promotion(&id)?;
            }
        },
        AdminCommand::ApplyJson(args) => apply_json(&mut editor, args).await?,
        AdminCommand::Replace(args) => {
            let count = editor.find_replace(&args.find, &args.replace)?;
            println!("replaced {count} occurrence(s)");
        }
        AdminCommand::Gist { command } => {
            let client = GistClient::new(GistConfig::from_env())?;
            match command {
                GistCommand::Load => {
                    editor
                        .load_from_gist(&client)
                        .await
                        .context("load from gist")?;
                }
                GistCommand::Save => {
                    editor.save_to_gist(&client).await.context("save to gist")?;
                    println!("saved to gist");
                    return Ok(());
                }
            }
        }
        AdminCommand::Reset(args) => {
            SettingsEditor::reset(&store, storage.as_ref(), args.yes).await?;
            println!("settings reset to defaults");
            return Ok(());
        }
    }

    editor.commit(&store, storage.as_ref()).await?;
    Ok(())
}

async fn new_book(args: BookAddArgs) -> anyhow::Result<NewBook> {
    let content = match (args.content, args.content_file) {
        (Some(content), _) => content,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("read content file: {path}"))?,
        (None, None) => String::new(),
    };
    Ok(NewBook {
        category_id: args.category,
        title: args.title,
        author: args.author,
        content,
        cover_color: args.cover,
    })
}

async fn apply_json(editor: &mut SettingsEditor, args: ApplyJsonArgs) -> anyhow::Result<()> {
    if args.categories.is_none() && args.promotions.is_none() {
        anyhow::bail!("pass --categories and/or --promotions");
    }
    if let Some(path) = args.categories {
        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("read categories file: {path}"))?;
        editor.edit_categories_text(text);
        editor.apply_categories_draft()?;
    }
    if let Some(path) = args.promotions {
        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("read promotions file: {path}"))?;
        editor.edit_promotions_text(text);
        editor.apply_promotions_draft()?;
    }
    Ok(())
}
