use jack_lang::compile_source;

#[test]
fn constructor_allocates_one_word_per_field() {
    let output = compile_source(
        "class Point {
            field int x;
            field int y;
            constructor Point new() {
                return this;
            }
        }",
    )
    .expect("compilation failed");

    assert_eq!(
        "function Point.new 0\n\
         push constant 2\n\
         call Memory.alloc 1\n\
         pop pointer 0\n\
         push pointer 0\n\
         return\n",
        output
    );
}

#[test]
fn statics_do_not_count_towards_the_allocation() {
    let output = compile_source(
        "class Counter {
            static int instances;
            field int value;
            constructor Counter new() {
                return this;
            }
        }",
    )
    .expect("compilation failed");

    assert!(output.contains(
        "function Counter.new 0\n\
         push constant 1\n\
         call Memory.alloc 1\n"
    ));
}

#[test]
fn constructor_body_sees_fields_through_this() {
    let output = compile_source(
        "class Point {
            field int x, y;
            constructor Point new(int ax, int ay) {
                let x = ax;
                let y = ay;
                return this;
            }
        }",
    )
    .expect("compilation failed");

    assert_eq!(
        "function Point.new 0\n\
         push constant 2\n\
         call Memory.alloc 1\n\
         pop pointer 0\n\
         push argument 0\n\
         pop this 0\n\
         push argument 1\n\
         pop this 1\n\
         push pointer 0\n\
         return\n",
        output
    );
}
