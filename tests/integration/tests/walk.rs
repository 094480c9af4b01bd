//! Integration tests for traversal order, pruning and error propagation.

mod common;

use std::ops::ControlFlow;

use common::{Recorder, init_tracing, label};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use treewalk_core::{TreeWalker, WalkError, WalkOptions, visitor_fn, walk};
use treewalk_node::{
    ContextMap, Element, ForwardRef, FunctionComponent, LazyNode, Node, Portal, RenderError, host,
};

async fn run(tree: &Node, recorder: &Recorder) -> Result<(), WalkError> {
    init_tracing();
    walk(tree, recorder, ContextMap::new(), WalkOptions::default()).await
}

/// A function component rendering `children` as-is.
fn passthrough(name: &str) -> FunctionComponent {
    FunctionComponent::new(name.to_string(), |props, _| {
        Ok(props
            .children()
            .and_then(|children| children.as_node())
            .cloned()
            .unwrap_or_default())
    })
}

mod primitives {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn visits_leaves_with_null_instance() {
        let tree: Node = Element::host("p")
            .with_children(vec![Node::from("text"), Node::from(3.5)])
            .into();
        let recorder = Recorder::new();

        run(&tree, &recorder).await.unwrap();

        let leaves: Vec<_> = recorder
            .visits()
            .into_iter()
            .filter(|visit| visit.label != "p")
            .collect();
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].label, "text");
        assert_eq!(leaves[1].label, "3.5");
        assert!(leaves.iter().all(|visit| !visit.has_instance));
        assert!(leaves.iter().all(|visit| visit.child_context.is_none()));
    }

    #[tokio::test]
    async fn root_primitive_is_visited() {
        let recorder = Recorder::new();

        run(&Node::from("alone"), &recorder).await.unwrap();

        assert_eq!(recorder.log(), vec!["alone"]);
    }
}

mod empties {
    use super::*;
    use pretty_assertions::assert_eq;

    #[rstest]
    #[case::empty(Node::Empty)]
    #[case::bool(Node::from(false))]
    #[case::none(Node::from(None::<Element>))]
    #[case::empty_string(Node::from(""))]
    #[case::zero(Node::from(0))]
    #[case::empty_sequence(Node::Sequence(Vec::new()))]
    #[case::stray_lazy(LazyNode::new(|| Ok(Node::from("x"))).into())]
    #[tokio::test]
    async fn never_visited(#[case] node: Node) {
        let recorder = Recorder::new();

        run(&node, &recorder).await.unwrap();

        assert!(recorder.log().is_empty());
    }
}

mod pruning {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn prunes_descendants_but_not_siblings() {
        let tree: Node = Element::host("main")
            .with_children(vec![
                Node::from(Element::host("nav").with_children(Element::host("a").with_children("home"))),
                Element::host("article").with_children("body").into(),
            ])
            .into();
        let recorder = Recorder::new().prune("nav");

        run(&tree, &recorder).await.unwrap();

        assert_eq!(recorder.log(), vec!["main", "nav", "article", "body"]);
    }

    #[tokio::test]
    async fn prune_skips_render() {
        let rendered = std::sync::Arc::new(Mutex::new(0));
        let counter = rendered.clone();
        let component = FunctionComponent::new("Expensive", move |_, _| {
            *counter.lock() += 1;
            Ok(Node::from("output"))
        });
        let tree: Node = component.element().into();
        let recorder = Recorder::new().prune("Expensive");

        run(&tree, &recorder).await.unwrap();

        assert_eq!(recorder.log(), vec!["Expensive"]);
        assert_eq!(*rendered.lock(), 0);
    }
}

mod ordering {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn rendered_children_run_one_at_a_time() {
        let list = passthrough("List");
        let tree: Node = list
            .element()
            .with_children(vec![
                Node::from(Element::host("a").with_children("a1")),
                Element::host("b").with_children("b1").into(),
                Element::host("c").with_children("c1").into(),
            ])
            .into();
        let recorder = Recorder::new().delay("a", 20).delay("a1", 10).delay("b", 5);

        run(&tree, &recorder).await.unwrap();

        assert_eq!(
            recorder.log(),
            vec![
                "List", "a", "a done", "a1", "a1 done", "b", "b done", "b1", "c", "c1",
            ]
        );
    }

    #[tokio::test]
    async fn direct_sibling_sequences_run_concurrently() {
        let tree: Node = vec![
            Node::from(vec![Node::from("slow")]),
            Node::from(vec![Node::from("fast")]),
        ]
        .into();
        let recorder = Recorder::new().delay("slow", 30);

        run(&tree, &recorder).await.unwrap();

        let log = recorder.log();
        let fast = log.iter().position(|entry| entry == "fast");
        let slow_done = log.iter().position(|entry| entry == "slow done");
        assert_eq!(log.len(), 3);
        assert!(fast < slow_done, "siblings were not interleaved: {log:?}");
    }

    #[tokio::test]
    async fn portal_children_are_walked_but_portal_is_not_visited() {
        let tree: Node = Element::host("body")
            .with_children(Portal::new(
                json!({ "target": "#modal" }),
                vec![Element::host("dialog").with_children("hi").into()],
            ))
            .into();
        let recorder = Recorder::new();

        run(&tree, &recorder).await.unwrap();

        assert_eq!(recorder.log(), vec!["body", "dialog", "hi"]);
    }

    #[tokio::test]
    async fn lazy_render_output_is_unwrapped() {
        let wrapper = FunctionComponent::new("Wrapper", |_, _| {
            Ok(LazyNode::new(|| Ok(LazyNode::new(|| Ok(Node::from("deep"))).into())).into())
        });
        let tree: Node = wrapper.element().into();
        let recorder = Recorder::new();

        run(&tree, &recorder).await.unwrap();

        assert_eq!(recorder.log(), vec!["Wrapper", "deep"]);
    }

    #[tokio::test]
    async fn forward_ref_returning_nothing_is_visited_once() {
        let forward = ForwardRef::new("Forwarded", |_| Ok(Node::Empty));
        let tree: Node = forward.element().into();
        let recorder = Recorder::new();

        run(&tree, &recorder).await.unwrap();

        assert_eq!(recorder.log(), vec!["Forwarded"]);
    }
}

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("cannot fetch {0}")]
    struct FetchError(String);

    #[tokio::test]
    async fn visitor_error_is_returned_as_is() {
        init_tracing();
        let seen = Mutex::new(Vec::new());
        let visitor = visitor_fn(|node, _, _, _| {
            let name = label(node);
            seen.lock().push(name.clone());
            if name == "broken" {
                return Err(FetchError(name).into());
            }
            Ok(ControlFlow::Continue(()))
        });
        let tree: Node = Element::host("div")
            .with_children(vec![
                Node::from(Element::host("broken").with_children("below")),
                Element::host("after").into(),
            ])
            .into();

        let err = walk(&tree, &visitor, ContextMap::new(), WalkOptions::default())
            .await
            .unwrap_err();

        assert_eq!(
            err.visitor_error::<FetchError>(),
            Some(&FetchError("broken".to_string()))
        );
        assert_eq!(seen.into_inner(), vec!["div", "broken"]);
    }

    #[tokio::test]
    async fn render_error_fails_the_walk() {
        let failing = FunctionComponent::new("Failing", |_, _| {
            Err(RenderError::component("Failing", "backend unavailable"))
        });
        let tree: Node = Element::host("div").with_children(failing.element()).into();
        let recorder = Recorder::new();

        let err = run(&tree, &recorder).await.unwrap_err();

        assert!(matches!(err, WalkError::Render(_)));
        assert!(err.to_string().contains("backend unavailable"));
        assert_eq!(recorder.log(), vec!["div", "Failing"]);
    }

    #[tokio::test]
    async fn first_error_wins_among_concurrent_siblings() {
        let failing = FunctionComponent::new("Failing", |_, _| {
            Err(RenderError::component("Failing", "boom"))
        });
        let tree: Node = vec![
            Node::from(vec![Node::from("slow")]),
            Node::from(vec![Node::from(failing.element())]),
        ]
        .into();
        let recorder = Recorder::new().delay("slow", 50);

        let err = run(&tree, &recorder).await.unwrap_err();

        assert!(matches!(err, WalkError::Render(RenderError::Component { .. })));
        assert!(!recorder.log().contains(&"slow done".to_string()));
    }
}

mod host_descriptions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[rstest]
    #[case::props_convention(json!({
        "type": "ul",
        "props": { "className": "list", "children": [
            { "type": "li", "props": { "children": "one" } },
            { "type": "li", "props": { "children": ["two", null, false] } }
        ]}
    }))]
    #[case::attributes_convention(json!({
        "nodeName": "ul",
        "attributes": { "class": "list" },
        "children": [
            { "nodeName": "li", "attributes": {}, "children": ["one"] },
            { "nodeName": "li", "children": ["two", null, false] }
        ]
    }))]
    #[tokio::test]
    async fn walks_both_conventions(#[case] description: serde_json::Value) {
        let tree = host::node_from_value(&description);
        let recorder = Recorder::new();

        run(&tree, &recorder).await.unwrap();

        assert_eq!(recorder.log(), vec!["ul", "li", "one", "li", "two"]);
    }

    #[tokio::test]
    async fn walks_portal_description() {
        let description = json!({
            "containerInfo": { "id": "overlay" },
            "children": { "props": { "children": [
                { "type": "span", "props": { "children": "floating" } }
            ]}}
        });
        let tree = host::node_from_value(&description);
        let recorder = Recorder::new();

        run(&tree, &recorder).await.unwrap();

        assert_eq!(recorder.log(), vec!["span", "floating"]);
    }

    #[tokio::test]
    async fn unrecognized_shape_is_skipped() {
        let tree = host::node_from_value(&json!({ "unknown": true }));
        let recorder = Recorder::new();

        run(&tree, &recorder).await.unwrap();

        assert!(recorder.log().is_empty());
    }
}

mod options {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn walker_from_json_options() {
        let options = WalkOptions::from_json(r#"{ "componentWillUnmount": true }"#).unwrap();
        let walker = TreeWalker::new(options);
        let recorder = Recorder::new();

        walker
            .walk(&Node::from("leaf"), &recorder, ContextMap::new())
            .await
            .unwrap();

        assert_eq!(recorder.log(), vec!["leaf"]);
    }

    #[test]
    fn malformed_options_are_config_errors() {
        let err = WalkOptions::from_json("{ componentWillUnmount }").unwrap_err();
        assert!(matches!(err, WalkError::Config(_)));
    }
}
