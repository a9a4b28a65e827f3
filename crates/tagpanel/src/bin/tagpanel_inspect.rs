//! tagpanel-inspect - print both tree views of a catalog fixture
//!
//! Optionally applies one drop before printing, which makes it easy to see
//! what a payload does to the trees:
//!
//! ```text
//! tagpanel-inspect catalog.yaml --drop-files 3,5 --target track:7
//! tagpanel-inspect catalog.yaml --drop-url https://musicbrainz.org/release/<mbid>
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossbeam::channel::unbounded;

use tagpanel::payload::{encode_ids, MIME_FILE_LIST, MIME_URI_LIST};
use tagpanel::{dnd, MainPanel, MimeData, ViewSide};
use tagpanel_core::config::PanelConfig;
use tagpanel_core::{
    AlbumId, ClusterId, ColumnSchema, FileId, MemoryCatalog, ObjectRef, TrackId,
};
use tagpanel_widgets::{NodeId, TreeModel};

#[derive(Parser, Debug)]
#[command(name = "tagpanel-inspect", about = "Print the file and album trees of a catalog")]
struct Args {
    /// YAML catalog fixture
    catalog: PathBuf,

    /// File ids to drop, comma separated
    #[arg(long, value_delimiter = ',')]
    drop_files: Vec<u64>,

    /// URLs or paths to drop
    #[arg(long)]
    drop_url: Vec<String>,

    /// Drop target: clusters, cluster:<id>, album:<id>, track:<id> or file:<id>
    #[arg(long)]
    target: Option<String>,
}

fn parse_target(value: &str) -> Result<ObjectRef> {
    if value == "clusters" {
        return Ok(ObjectRef::ClusterList);
    }
    let Some((kind, id)) = value.split_once(':') else {
        bail!("Invalid target {:?}, expected <kind>:<id>", value);
    };
    let id: u64 = id
        .trim()
        .parse()
        .with_context(|| format!("Invalid id in target {:?}", value))?;
    Ok(match kind {
        "cluster" => ObjectRef::Cluster(ClusterId(id)),
        "album" => ObjectRef::Album(AlbumId(id)),
        "track" => ObjectRef::Track(TrackId(id)),
        "file" => ObjectRef::File(FileId(id)),
        other => bail!("Unknown target kind {:?}", other),
    })
}

fn print_tree(title: &str, tree: &TreeModel) {
    println!("== {} ==", title);
    for &root in tree.roots() {
        print_node(tree, root, 0);
    }
}

fn print_node(tree: &TreeModel, id: NodeId, depth: usize) {
    let Some(node) = tree.node(id) else {
        return;
    };
    let glyph = node.icon.map(|i| i.glyph()).unwrap_or(" ");
    let cells: Vec<&str> = node.cells.iter().map(|c| c.text.as_str()).collect();
    let object = node.object.map(|o| o.to_string()).unwrap_or_default();
    let hidden = if node.hidden { " (hidden)" } else { "" };
    println!(
        "{}{} {}  [{}]{}",
        "  ".repeat(depth),
        glyph,
        cells.join(" | "),
        object,
        hidden
    );
    for &child in &node.children {
        print_node(tree, child, depth + 1);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let yaml = std::fs::read_to_string(&args.catalog)
        .with_context(|| format!("Failed to read catalog {:?}", args.catalog))?;
    let mut catalog = MemoryCatalog::from_yaml_str(&yaml)?;
    catalog.drain_events();

    let (tx, rx) = unbounded();
    let mut panel = MainPanel::new(&catalog, &PanelConfig::default(), ColumnSchema::default(), tx);

    let mut data = MimeData::new();
    if !args.drop_url.is_empty() {
        data.set(MIME_URI_LIST, args.drop_url.join("\n"));
    }
    if !args.drop_files.is_empty() {
        data.set(MIME_FILE_LIST, encode_ids(&args.drop_files));
    }

    if !data.is_empty() {
        let target = args.target.as_deref().map(parse_target).transpose()?;
        let handled = match target {
            None => dnd::drop_mime_data(&mut catalog, None, &data),
            Some(object) => {
                let found = ViewSide::BOTH.into_iter().find_map(|side| {
                    panel.view_of(side).tree.node_for(object).map(|node| (side, node))
                });
                let Some((side, node)) = found else {
                    bail!("Target {} is not shown in either view", object);
                };
                let index = panel.view_of(side).tree.children(node).len();
                panel.drop_mime_data(&mut catalog, side, Some(node), index, &data)
            }
        };
        log::info!("main: drop handled = {}", handled);

        for event in catalog.drain_events() {
            panel.handle_catalog_event(&catalog, &event);
        }
    }

    print_tree("Files", &panel.view_of(ViewSide::Files).tree);
    println!();
    print_tree("Albums", &panel.view_of(ViewSide::Albums).tree);

    for event in rx.try_iter() {
        log::debug!("main: panel event {:?}", event);
    }
    Ok(())
}
