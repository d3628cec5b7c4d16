use jack_lang::compile_source;

#[test]
fn while_countdown() {
    let output = compile_source(
        "class Main {
            function void run() {
                var int x;
                while (x > 0) { let x = x - 1; }
                return;
            }
        }",
    )
    .expect("compilation failed");

    assert!(output.contains(
        "label WHILE.EXP0\n\
         push local 0\n\
         push constant 0\n\
         gt\n\
         not\n\
         if-goto WHILE.END1\n\
         push local 0\n\
         push constant 1\n\
         sub\n\
         pop local 0\n\
         goto WHILE.EXP0\n\
         label WHILE.END1\n"
    ));
}

#[test]
fn if_without_else() {
    let output = compile_source(
        "class Main {
            function void run(boolean flag) {
                if (flag) { do Output.println(); }
                return;
            }
        }",
    )
    .expect("compilation failed");

    assert_eq!(
        "function Main.run 0\n\
         push argument 0\n\
         not\n\
         if-goto IF.ELSE0\n\
         call Output.println 0\n\
         pop temp 0\n\
         label IF.ELSE0\n\
         push constant 0\n\
         return\n",
        output
    );
}

#[test]
fn if_with_else() {
    let output = compile_source(
        "class Main {
            function int pick(boolean flag) {
                if (flag) { return 1; } else { return 2; }
            }
        }",
    )
    .expect("compilation failed");

    assert_eq!(
        "function Main.pick 0\n\
         push argument 0\n\
         not\n\
         if-goto IF.ELSE0\n\
         push constant 1\n\
         return\n\
         goto IF.END1\n\
         label IF.ELSE0\n\
         push constant 2\n\
         return\n\
         label IF.END1\n",
        output
    );
}

#[test]
fn nested_structures_draw_distinct_labels() {
    let output = compile_source(
        "class Main {
            function void run(int n) {
                while (n > 0) {
                    if (n > 10) { let n = n - 2; } else { let n = n - 1; }
                }
                return;
            }
        }",
    )
    .expect("compilation failed");

    // outer while takes 0/1, inner if takes 2/3
    assert!(output.contains("label WHILE.EXP0\n"));
    assert!(output.contains("if-goto WHILE.END1\n"));
    assert!(output.contains("if-goto IF.ELSE2\n"));
    assert!(output.contains("goto IF.END3\n"));
    assert!(output.contains("goto WHILE.EXP0\nlabel WHILE.END1\n"));
}

#[test]
fn label_counter_spans_the_whole_class() {
    let output = compile_source(
        "class Main {
            function void first(boolean a) {
                if (a) { }
                return;
            }
            function void second(boolean a) {
                while (a) { }
                return;
            }
        }",
    )
    .expect("compilation failed");

    // the counter keeps running across subroutines of one class
    assert!(output.contains("label IF.ELSE0\n"));
    assert!(output.contains("label WHILE.EXP2\n"));
    assert!(output.contains("if-goto WHILE.END3\n"));
}
