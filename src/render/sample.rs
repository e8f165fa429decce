/// Built-in document shown when there is no saved snapshot, and on "load sample".
pub const SAMPLE: &str = r#"# Welcome to gitmd

Type on the left, the sanitized HTML preview updates on the right.

- **GFM** tables, ~~strikethrough~~ and task lists
- [x] Auto-saves as you type
- [ ] Drop a `.md` file onto the terminal to open it

| Key | Action |
|-----|--------|
| Ctrl+S | Save now |
| Ctrl+L | Load this sample |
| Ctrl+Y | Copy preview HTML |

## Code

```rust
fn greet(name: &str) -> String {
    format!("Hello, {name}")
}
```

> Open a file with Ctrl+O, or pass one on the command line.
"#;
