use cmdtree::{CommandDispatcher, LongArgument, StringArgument};

fn main() {
    let name = StringArgument::new()
        .length(1, 64)
        .expect("Invalid name declaration");

    let dispatcher = CommandDispatcher::new()
        .register("greet", |node| {
            node.arg("name", name)
                .flag("times", Some('t'), LongArgument::bounded(1, 10, 1))
                .switch("shout", Some('s'))
                .executes(|context| {
                    let name: String = context.value("name").unwrap();
                    let times: i64 = context.value("times").unwrap();
                    let mut line = format!("Hello, {name}!");

                    if context.value::<bool>("shout").unwrap() {
                        line = line.to_uppercase();
                    }

                    vec![line; times as usize].join("\n")
                })
        })
        .expect("Invalid command configuration");

    // The whole command line is one console input (ex: `greeter 'greet "Ada Lovelace" -t 2'`).
    let input: Vec<String> = std::env::args().skip(1).collect();

    match dispatcher.run(&input.join(" ")) {
        Ok(output) => println!("{output}"),
        Err(exit_code) => std::process::exit(exit_code),
    }
}
