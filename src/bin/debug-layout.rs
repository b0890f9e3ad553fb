/// Diagnostic tool to verify the CSV → tree → partition → zoom pipeline
use std::f64::consts::TAU;
use std::path::PathBuf;

use sunburst_rs::config::ChartConfig;
use sunburst_rs::layout::{arc_visible, label_visible, partition, zoom_targets};
use sunburst_rs::render::arc::ArcGeometry;
use sunburst_rs::tree::{self, arena::CompanyTree};
use sunburst_rs::ui::selector::list_roots;
use sunburst_rs::{data, layout::PolarSpan};

fn main() -> anyhow::Result<()> {
    sunburst_rs::init_logging();

    let mut args = std::env::args().skip(1);
    let csv = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("companies.csv"));
    let root_arg = args.next();

    println!("=== DIAGNOSTIC: CSV → Tree → Layout Pipeline ===");
    println!("Reading: {}", csv.display());

    let records = data::load_records(&csv)?;
    println!("\n[1] Loaded {} rows", records.len());

    let roots = list_roots(&records);
    println!("\n[2] {} root groups:", roots.len());
    for (i, root) in roots.iter().enumerate().take(20) {
        let rows = records.iter().filter(|r| &r.root == root).count();
        println!("    [{}] '{}' ({} rows)", i, root, rows);
    }

    let Some(root) = root_arg.or_else(|| roots.first().map(|r| r.to_string())) else {
        println!("\nNothing to lay out.");
        return Ok(());
    };

    let tree = match tree::build_tree(&records, &root) {
        Ok(tree) => tree,
        Err(e) => {
            println!("\n[3] Group '{}' cannot be drawn: {}", root, e);
            return Ok(());
        }
    };
    let root_node = tree.get(tree.root);
    println!(
        "\n[3] Tree for '{}': {} nodes, height {}, root '{}' (value={})",
        root,
        tree.len(),
        root_node.height,
        root_node.company,
        root_node.value
    );

    println!("\n[4] Top-level branches:");
    for (i, &child) in tree.children(tree.root).iter().take(10).enumerate() {
        let node = tree.get(child);
        println!(
            "    [{}] '{}' - value {} ({} children, {} descendants)",
            i,
            node.company,
            node.value,
            node.children.len(),
            tree.descendant_count(child)
        );
    }

    let base = partition(&tree);
    report_spans("[5] Base partition", &tree, &base);

    // Zoom into the largest branch, as a click on it would.
    if let Some(&focus) = tree.children(tree.root).iter().find(|&&c| !tree.get(c).is_leaf()) {
        let targets = zoom_targets(&tree, &base, focus);
        let title = format!("[6] Zoomed to '{}'", tree.get(focus).company);
        report_spans(&title, &tree, &targets);
    }

    println!("\n[7] Checking for anomalies:");
    let mut problems = 0;
    for id in tree.ids() {
        let children = tree.children(id);
        if children.is_empty() {
            continue;
        }
        let span = base[id.index()];
        let covered: f64 = children.iter().map(|c| base[c.index()].angular_width()).sum();
        if (covered - span.angular_width()).abs() > 1e-9 {
            problems += 1;
            println!(
                "    '{}': children cover {:.6} rad of {:.6}",
                tree.get(id).company,
                covered,
                span.angular_width()
            );
        }
    }
    let ring_one: f64 = tree
        .children(tree.root)
        .iter()
        .map(|c| base[c.index()].angular_width())
        .sum();
    println!("    Ring 1 coverage: {:.2}%", ring_one / TAU * 100.0);
    println!("    {} partition gaps", problems);

    Ok(())
}

fn report_spans(title: &str, tree: &CompanyTree, spans: &[PolarSpan]) {
    let config = ChartConfig::default();
    let visible = spans.iter().skip(1).filter(|s| arc_visible(s)).count();
    let labelled = spans.iter().skip(1).filter(|s| label_visible(s)).count();
    println!(
        "\n{}: {} arcs visible, {} labels visible (of {})",
        title,
        visible,
        labelled,
        spans.len() - 1
    );

    let mut widest: Vec<_> = tree
        .ids()
        .filter(|&id| id != tree.root && arc_visible(&spans[id.index()]))
        .collect();
    widest.sort_by(|a, b| {
        spans[b.index()]
            .angular_width()
            .total_cmp(&spans[a.index()].angular_width())
    });
    for (i, id) in widest.iter().take(8).enumerate() {
        let span = spans[id.index()];
        let geo = ArcGeometry::from_span(&span, &config);
        println!(
            "    [{}] '{}' - x {:.3}..{:.3} rad, ring {:.0}..{:.0}, r {:.0}..{:.0}px",
            i,
            tree.get(*id).company,
            span.x0,
            span.x1,
            span.y0,
            span.y1,
            geo.inner_radius,
            geo.outer_radius
        );
    }
}
