use jack_lang::compile_source;

#[test]
fn compile_scalar_assignment() {
    let output = compile_source(
        "class Main {
            function void run() {
                var int x;
                let x = 1 + 2;
                return;
            }
        }",
    )
    .expect("compilation failed");

    assert_eq!(
        "function Main.run 1\n\
         push constant 1\n\
         push constant 2\n\
         add\n\
         pop local 0\n\
         push constant 0\n\
         return\n",
        output
    );
}

#[test]
fn operators_associate_left_to_right() {
    let output = compile_source(
        "class Main {
            function int calc() {
                return 1 + 2 * 3;
            }
        }",
    )
    .expect("compilation failed");

    // (1 + 2) * 3 -- the language has no operator precedence
    assert_eq!(
        "function Main.calc 0\n\
         push constant 1\n\
         push constant 2\n\
         add\n\
         push constant 3\n\
         call Math.multiply 2\n\
         return\n",
        output
    );
}

#[test]
fn division_lowers_to_runtime_call() {
    let output = compile_source(
        "class Main {
            function int half(int x) {
                return x / 2;
            }
        }",
    )
    .expect("compilation failed");

    assert!(output.contains(
        "push argument 0\n\
         push constant 2\n\
         call Math.divide 2\n"
    ));
}

#[test]
fn unary_operators_follow_their_operand() {
    let output = compile_source(
        "class Main {
            function boolean check(int x) {
                return ~(x < 0);
            }
        }",
    )
    .expect("compilation failed");

    assert_eq!(
        "function Main.check 0\n\
         push argument 0\n\
         push constant 0\n\
         lt\n\
         not\n\
         return\n",
        output
    );
}

#[test]
fn negation_applies_to_the_whole_term() {
    let output = compile_source(
        "class Main {
            function int flip(int x) {
                return -x + 1;
            }
        }",
    )
    .expect("compilation failed");

    assert_eq!(
        "function Main.flip 0\n\
         push argument 0\n\
         neg\n\
         push constant 1\n\
         add\n\
         return\n",
        output
    );
}

#[test]
fn parenthesized_expressions_group_terms() {
    let output = compile_source(
        "class Main {
            function int calc(int a, int b) {
                return a * (b + 1);
            }
        }",
    )
    .expect("compilation failed");

    assert_eq!(
        "function Main.calc 0\n\
         push argument 0\n\
         push argument 1\n\
         push constant 1\n\
         add\n\
         call Math.multiply 2\n\
         return\n",
        output
    );
}
