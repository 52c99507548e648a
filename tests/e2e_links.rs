//! End-to-end tests for idempotent link mutation.
//!
//! Each test opens an in-memory session, creates nodes, mutates links and
//! reads the raw records back from the store.

use pretty_assertions::assert_eq;
use sst::{
    Association, Link, LinkClass, MemoryStore, NodeRef, Partition, RecordStore, SemanticType,
    SessionConfig, Spacetime, Value,
};

async fn open() -> Spacetime<MemoryStore> {
    Spacetime::open_memory(SessionConfig::new(["Person", "Country", "Node"]))
        .await
        .unwrap()
}

async fn stored(st: &Spacetime<MemoryStore>, class: LinkClass, key: &str) -> Option<Link> {
    st.store()
        .get(&Partition::Links(class), key)
        .await
        .unwrap()
        .map(|rec| serde_json::from_value(rec).unwrap())
}

// ============================================================================
// 1. Create, then increment, a Near link
// ============================================================================

#[tokio::test]
async fn test_related_then_increment() {
    let st = open().await;
    let alice = st.create_node("Person", "alice", None, 1.0).await.unwrap();
    let france = st.create_node("Country", "france", None, 1.0).await.unwrap();

    st.create_link(&alice, "related", &france, None, 1.0).await.unwrap();

    let near = Partition::Links(LinkClass::Near);
    assert_eq!(st.store().count(&near).await.unwrap(), 1);
    let key = sst::model::link_key(
        &NodeRef::new("Person", "alice"),
        "related",
        &NodeRef::new("Country", "france"),
        false,
    );
    let link = stored(&st, LinkClass::Near, &key).await.unwrap();
    assert_eq!(link.weight, 1.0);
    assert_eq!(link.from.to_string(), "Person/alice");
    assert_eq!(link.to.to_string(), "Country/france");
    assert!(!link.negated);

    st.increment_link(&alice, "related", &france, None).await.unwrap();
    assert_eq!(st.store().count(&near).await.unwrap(), 1);
    assert_eq!(stored(&st, LinkClass::Near, &key).await.unwrap().weight, 2.0);
}

// ============================================================================
// 2. Repeating a create converges on one record
// ============================================================================

#[tokio::test]
async fn test_create_link_twice_is_one_record() {
    let st = open().await;
    let a = st.create_node("Node", "from_node", None, 1.0).await.unwrap();
    let b = st.create_node("Node", "to_node", None, 1.0).await.unwrap();

    let first = st.create_link(&a, "uses", &b, Some(Value::from("x")), 1.0).await.unwrap();
    let second = st.create_link(&a, "uses", &b, Some(Value::from("x")), 1.0).await.unwrap();
    assert_eq!(first, second);

    let follows = Partition::Links(LinkClass::Follows);
    assert_eq!(st.store().count(&follows).await.unwrap(), 1);
}

// ============================================================================
// 3. Changing only data or weight keeps the key
// ============================================================================

#[tokio::test]
async fn test_update_keeps_key() {
    let st = open().await;
    let a = st.create_node("Node", "a", None, 1.0).await.unwrap();
    let b = st.create_node("Node", "b", None, 1.0).await.unwrap();

    let first = st.create_link(&a, "contains", &b, None, 1.0).await.unwrap();
    let second = st.create_link(&a, "contains", &b, Some(Value::from("box")), 7.0).await.unwrap();
    assert_eq!(first.key, second.key);

    let link = stored(&st, LinkClass::Contains, &first.key).await.unwrap();
    assert_eq!(link.weight, 7.0);
    assert_eq!(link.data, Some(Value::from("box")));
}

// ============================================================================
// 4. A link and its negation coexist
// ============================================================================

#[tokio::test]
async fn test_create_and_block_coexist() {
    let st = open().await;
    let a = st.create_node("Node", "a", None, 1.0).await.unwrap();
    let b = st.create_node("Node", "b", None, 1.0).await.unwrap();

    let positive = st.create_link(&a, "expresses", &b, None, 3.0).await.unwrap();
    let negative = st.block_link(&a, "expresses", &b, None, 0.5).await.unwrap();
    assert_ne!(positive.key, negative.key);
    assert!(negative.negated);

    let expresses = Partition::Links(LinkClass::Expresses);
    assert_eq!(st.store().count(&expresses).await.unwrap(), 2);
    assert_eq!(stored(&st, LinkClass::Expresses, &positive.key).await.unwrap().weight, 3.0);
    assert_eq!(stored(&st, LinkClass::Expresses, &negative.key).await.unwrap().weight, 0.5);

    // blocking again with a new weight only touches the negated slot
    st.block_link(&a, "expresses", &b, None, 0.9).await.unwrap();
    assert_eq!(stored(&st, LinkClass::Expresses, &positive.key).await.unwrap().weight, 3.0);
    assert_eq!(stored(&st, LinkClass::Expresses, &negative.key).await.unwrap().weight, 0.9);
}

// ============================================================================
// 5. Increment never short-circuits
// ============================================================================

#[tokio::test]
async fn test_increment_from_scratch_and_repeatedly() {
    let st = open().await;
    let a = st.create_node("Node", "a", None, 1.0).await.unwrap();
    let b = st.create_node("Node", "b", None, 1.0).await.unwrap();

    let mut weights = Vec::new();
    for _ in 0..4 {
        weights.push(st.increment_link(&a, "coactive", &b, None).await.unwrap().weight);
    }
    assert_eq!(weights, vec![1.0, 2.0, 3.0, 4.0]);
}

#[tokio::test]
async fn test_increment_replaces_data() {
    let st = open().await;
    st.create_node("Node", "a", None, 1.0).await.unwrap();
    st.create_node("Node", "b", None, 1.0).await.unwrap();

    st.create_link_by_id("Node/a", "uses", "Node/b", Some(Value::from("old")), 1.0).await.unwrap();
    let link = st
        .increment_link_by_id("Node/a", "uses", "Node/b", Some(Value::from("new")))
        .await
        .unwrap();
    assert_eq!(link.weight, 2.0);
    assert_eq!(link.data, Some(Value::from("new")));
}

// ============================================================================
// 6. Delete is idempotent
// ============================================================================

#[tokio::test]
async fn test_delete_link() {
    let st = open().await;
    let a = st.create_node("Node", "from_node", None, 1.0).await.unwrap();
    let b = st.create_node("Node", "to_node", None, 1.0).await.unwrap();

    st.create_link(&a, "related", &b, None, 1.0).await.unwrap();
    st.create_link(&a, "contains", &b, None, 1.0).await.unwrap();

    st.delete_link(&a, "related", &b, false).await.unwrap();
    assert!(st.get_link(&a.node_ref(), "related", &b.node_ref(), false).await.unwrap().is_none());
    assert!(st.get_link(&a.node_ref(), "contains", &b.node_ref(), false).await.unwrap().is_some());

    st.delete_link(&a, "related", &b, false).await.unwrap();
    st.delete_link(&a, "related", &b, true).await.unwrap();
    st.delete_link_by_id("Node/nobody", "alias", "Node/nothing", false).await.unwrap();
}

// ============================================================================
// 7. Custom associations and full table replacement
// ============================================================================

#[tokio::test]
async fn test_custom_association_routes_by_magnitude() {
    let st = open().await;
    st.create_association(Association::new(
        "Visa Waiver",
        SemanticType::EXPRESSES,
        "grants visa to",
        "holds visa from",
        "did not grant visa to",
        "does not hold visa from",
    ))
    .unwrap();

    let usa = st.create_node("Country", "USA", None, 0.0).await.unwrap();
    let mark = st.create_node("Person", "Professor Burgess", None, 0.0).await.unwrap();
    let link = st.create_link(&usa, "Visa Waiver", &mark, None, 1.0).await.unwrap();
    assert_eq!(link.relation, "Visa_Waiver");
    assert_eq!(st.link_id(&link).unwrap().partition, Partition::Links(LinkClass::Expresses));
    assert_eq!(
        st.describe_link(&link).unwrap(),
        "Country/USA grants visa to Person/Professor_Burgess"
    );
}

#[tokio::test]
async fn test_replacement_table_drops_defaults() {
    let config = SessionConfig::new(["Node"]).with_associations([Association::new(
        "near",
        SemanticType::NEAR,
        "is near",
        "is near",
        "is not near",
        "is not near",
    )]);
    let st = Spacetime::open_memory(config).await.unwrap();
    let a = st.create_node("Node", "from_node", None, 1.0).await.unwrap();
    let b = st.create_node("Node", "to_node", None, 1.0).await.unwrap();

    let link = st.create_link(&a, "near", &b, None, 1.0).await.unwrap();
    assert_eq!(link.key, "+4:Node9:from_node4:near4:Node7:to_node");
    assert!(matches!(
        st.create_link(&a, "related", &b, None, 1.0).await,
        Err(sst::Error::UnknownAssociation(_))
    ));
}

#[tokio::test]
async fn test_sessions_do_not_share_associations() {
    let one = open().await;
    let two = open().await;
    one.create_association(Association::new("owns", SemanticType::CONTAINS, "owns", "is owned by", "does not own", "is not owned by"))
        .unwrap();
    assert!(one.association("owns").is_ok());
    assert!(two.association("owns").is_err());
}

// ============================================================================
// 8. Keys built from run-together names stay distinct
// ============================================================================

#[tokio::test]
async fn test_lookalike_endpoints_keep_separate_links() {
    let st = open().await;
    let x = st.create_node("Node", "x", None, 1.0).await.unwrap();
    let yz = st.create_node("Node", "yrelatedNode_z", None, 1.0).await.unwrap();
    let xy = st.create_node("Node", "xrelatedNode_y", None, 1.0).await.unwrap();
    let z = st.create_node("Node", "z", None, 1.0).await.unwrap();

    let first = st.create_link(&x, "related", &yz, None, 1.0).await.unwrap();
    let second = st.create_link(&xy, "related", &z, None, 5.0).await.unwrap();
    assert_ne!(first.key, second.key);

    let near = Partition::Links(LinkClass::Near);
    assert_eq!(st.store().count(&near).await.unwrap(), 2);
    let back = st
        .get_link(&x.node_ref(), "related", &yz.node_ref(), false)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(back, first);
}
