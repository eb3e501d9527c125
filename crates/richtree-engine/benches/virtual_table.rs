use criterion::{Criterion, criterion_group, criterion_main};
use richtree_engine::Dom;
use richtree_engine::editing::{GridAxis, GridRequest, VirtualTable};

fn generate_table_markup(rows: usize, cols: usize) -> String {
    let mut markup = String::from("<table>");
    for r in 0..rows {
        markup.push_str("<tr>");
        for c in 0..cols {
            // sprinkle spans so the grid has virtual cells to expand
            if r % 5 == 0 && c == 0 {
                markup.push_str("<td rowspan=\"2\">x</td>");
            } else if r % 7 == 0 && c == 2 {
                markup.push_str("<td colspan=\"2\">x</td>");
            } else {
                markup.push_str("<td>x</td>");
            }
        }
        markup.push_str("</tr>");
    }
    markup.push_str("</table>");
    markup
}

fn bench_virtual_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("virtual_table");
    group.sample_size(20);

    let dom = Dom::from_html(&generate_table_markup(100, 10));
    let table = dom.first_child(dom.root()).unwrap();
    let last_row = dom.last_child(table).unwrap();
    let cell = dom.first_child(last_row).unwrap();

    group.bench_function("build_grid", |b| {
        b.iter(|| {
            let vt = VirtualTable::build(
                std::hint::black_box(&dom),
                cell,
                GridAxis::Row,
                GridRequest::Add,
                table,
            );
            std::hint::black_box(vt.start_point());
        });
    });

    group.bench_function("action_list", |b| {
        let vt = VirtualTable::build(&dom, cell, GridAxis::Column, GridRequest::Delete, table);
        b.iter(|| {
            let actions = vt.action_list();
            std::hint::black_box(actions);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_virtual_table);
criterion_main!(benches);
