use cmdtree::{
    CommandDispatcher, Context, LongArgument, PathArgument, PathKind, SingleSelectArgument,
    StringArgument,
};
use std::io::BufRead;
use std::path::PathBuf;

fn build(profile: &'static str) -> impl Fn(Context) -> String + Send + Sync + 'static {
    move |context| {
        let target: &str = context.value("target").unwrap();
        let jobs: i64 = context.value("jobs").unwrap();
        let mut line = format!("Building {target} ({profile}) with {jobs} job(s).");

        if context.value::<bool>("verbose").unwrap() {
            line.push_str(&format!("\n{context}"));
        }

        line
    }
}

fn main() {
    let target = SingleSelectArgument::new(vec!["x86", "arm", "wasm"])
        .expect("Invalid target declaration");

    let dispatcher = CommandDispatcher::new()
        .register("build", |node| {
            node.switch("verbose", Some('v'))
                .nodes(|c| {
                    c.node("release", |n| {
                        n.flag("opt-level", Some('O'), LongArgument::bounded(0, 3, 3))
                            .executes(build("release"))
                    })
                    .node("debug", |n| n.executes(build("debug")))
                    // Any other profile name is built as debug.
                    .node("", |n| n.executes(build("debug")))
                })
                .arg("target", target)
                .flag("jobs", Some('j'), LongArgument::bounded(1, 64, 1))
        })
        .and_then(|d| {
            d.register("clean", |node| {
                node.arg(
                    "dir",
                    PathArgument::new().path_kind(PathKind::Directory),
                )
                .switch("dry-run", None)
                .executes(|context| {
                    let dir: PathBuf = context.value("dir").unwrap();
                    let verb = if context.value::<bool>("dry-run").unwrap() {
                        "Would clean"
                    } else {
                        "Cleaned"
                    };
                    format!("{verb} {}.", dir.display())
                })
            })
        })
        .and_then(|d| {
            d.register("echo", |node| {
                node.arg("text", StringArgument::new())
                    .executes(|context| context.value::<String>("text").unwrap())
            })
        })
        .expect("Invalid command configuration");

    let stdin = std::io::stdin();

    for line in stdin.lock().lines() {
        let line = line.expect("Failed to read the console input");

        if line.trim() == "exit" {
            break;
        }

        if let Ok(output) = dispatcher.run(&line) {
            println!("{output}");
        }
    }
}
