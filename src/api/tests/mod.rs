mod run;

/// `n` bindings that are all still live when one expression sums them.
pub(super) fn wide_sum(n: usize) -> String {
    let mut src = String::new();
    for k in 0..n {
        src.push_str(&format!("val a{k} = {k};\n"));
    }
    let names: Vec<String> = (0..n).map(|k| format!("a{k}")).collect();
    src.push_str(&format!("val s = {};\nprint(s);\n", names.join(" + ")));
    src
}
