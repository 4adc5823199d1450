use divan::{Bencher, black_box};

fn main() {
    divan::main();
}

/// A page-shaped document with `rows` table rows.
fn sample_html(rows: usize) -> String {
    let mut html = String::from(r#"<div class="page"><h1 title="Report &amp; summary">Report</h1><table>"#);
    for i in 0..rows {
        html.push_str(&format!(
            r#"<tr><td><input type="checkbox" checked></td><td style="color: red">row {i} &lt;{i}&gt;</td><td><br></td></tr>"#
        ));
    }
    html.push_str("</table><!-- end --></div>");
    html
}

#[divan::bench(args = [10, 100, 1000])]
fn parse(bencher: Bencher, rows: usize) {
    let html = sample_html(rows);
    bencher.bench_local(|| {
        let parsed = duodom::parse(black_box(&html));
        black_box(parsed);
    });
}

#[divan::bench(args = [10, 100, 1000])]
fn serialize(bencher: Bencher, rows: usize) {
    let (tree, root) = duodom::parse(&sample_html(rows));
    bencher.bench_local(|| {
        let html = black_box(&tree).inner_html(root);
        black_box(html);
    });
}

#[divan::bench(args = [10, 100, 1000])]
fn splice_rows(bencher: Bencher, rows: usize) {
    bencher
        .with_inputs(|| duodom::parse(&sample_html(rows)))
        .bench_local_values(|(mut tree, root)| {
            // move every other row to the front of its table body
            let div = tree.first_child(root).unwrap();
            let table = tree.children(div).nth(1).unwrap();
            let tbody = tree.first_child(table).unwrap();
            let moved: Vec<_> = tree.children(tbody).step_by(2).collect();
            tree.prepend_children(tbody, &moved).unwrap();
            black_box(tree);
        });
}
