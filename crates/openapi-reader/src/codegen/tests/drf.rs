use http::StatusCode;

use super::support::{PETSTORE, WIDGETS, assert_contains, position, render};
use crate::codegen::{
  Concurrency, DrfEmitter,
  drf::{SERIALIZERS_FILE, VIEWS_FILE, status_constant},
};

fn petstore_files() -> (String, String) {
  let mut files = render(&DrfEmitter, PETSTORE, Concurrency::Async);
  let serializers = files.remove(SERIALIZERS_FILE).expect("serializers.py is rendered");
  let views = files.remove(VIEWS_FILE).expect("views.py is rendered");
  assert!(files.is_empty(), "unexpected extra files: {:?}", files.keys());
  (serializers, views)
}

#[test]
fn test_serializers_header_and_imports() {
  let (serializers, _) = petstore_files();
  assert!(
    serializers.starts_with(
      "# Generated by openapi-reader from petstore.yaml. Do not edit by hand.\n\nfrom rest_framework import serializers\n\n\nclass OrderSerializer(serializers.Serializer):\n"
    ),
    "{serializers}"
  );
}

#[test]
fn test_serializers_follow_dependency_order() {
  let (serializers, _) = petstore_files();
  let order = [
    "OrderSerializer",
    "AddressSerializer",
    "CustomerSerializer",
    "CategorySerializer",
    "UserSerializer",
    "TagSerializer",
    "PetSerializer",
    "ApiResponseSerializer",
  ]
  .map(|name| position(&serializers, &format!("class {name}(")));
  assert!(order.is_sorted(), "classes out of order: {order:?}");
}

#[test]
fn test_pet_serializer_fields() {
  let (serializers, _) = petstore_files();
  assert_contains(
    &serializers,
    "class PetSerializer(serializers.Serializer):
    id = serializers.IntegerField(required=False)
    name = serializers.CharField()
    category = CategorySerializer(required=False)
    photo_urls = serializers.ListField(child=serializers.CharField())
    tags = TagSerializer(many=True, required=False)
    status = serializers.ChoiceField(choices=[\"available\", \"pending\", \"sold\"], required=False)",
  );
}

#[test]
fn test_field_mapping_for_temporal_email_and_nested_lists() {
  let (serializers, _) = petstore_files();
  assert_contains(
    &serializers,
    "ship_date = serializers.DateTimeField(required=False)",
  );
  assert_contains(&serializers, "email = serializers.EmailField(required=False)");
  assert_contains(&serializers, "complete = serializers.BooleanField(required=False)");
  assert_contains(&serializers, "address = AddressSerializer(many=True, required=False)");
}

#[test]
fn test_wrapper_and_constrained_serializers() {
  let files = render(&DrfEmitter, WIDGETS, Concurrency::Sync);
  let serializers = &files[SERIALIZERS_FILE];

  assert_contains(
    serializers,
    "class TagsSerializer(serializers.ListSerializer):\n    child = serializers.CharField()",
  );
  assert_contains(
    serializers,
    "class ColorSerializer(serializers.Serializer):\n    value = serializers.ChoiceField(choices=[\"red\", \"green\"])",
  );
  assert_contains(
    serializers,
    "class WidgetSerializer(serializers.Serializer):
    label = serializers.CharField(min_length=1, max_length=20)
    weight = serializers.FloatField(min_value=0, required=False)
    sizes = serializers.ListField(child=serializers.ChoiceField(choices=[\"small\", \"large\"]), required=False)
    color = ColorSerializer(required=False)",
  );
}

#[test]
fn test_views_imports_only_used_serializers() {
  let (_, views) = petstore_files();
  assert_contains(
    &views,
    "from rest_framework import status
from rest_framework.decorators import api_view
from rest_framework.response import Response
from .serializers import ApiResponseSerializer, OrderSerializer, PetSerializer, UserSerializer",
  );
}

#[test]
fn test_view_validates_request_bodies() {
  let (_, views) = petstore_files();
  assert_contains(
    &views,
    "@api_view([\"PUT\", \"POST\"])
def update_pet(request):
    if request.method == \"PUT\":
        # Update an existing pet
        serializer = PetSerializer(data=request.data)
        if serializer.is_valid():
            return Response(serializer.data, status=status.HTTP_200_OK)
        return Response(serializer.errors, status=status.HTTP_400_BAD_REQUEST)
    if request.method == \"POST\":
        # Add a new pet to the store
        serializer = PetSerializer(data=request.data)",
  );
}

#[test]
fn test_view_takes_path_params_and_serializes_responses() {
  let (_, views) = petstore_files();
  assert_contains(
    &views,
    "@api_view([\"GET\", \"POST\", \"DELETE\"])
def get_pet_by_id(request, pet_id):
    if request.method == \"GET\":
        # Find pet by ID
        data = {}
        serializer = PetSerializer(data)
        return Response(serializer.data, status=status.HTTP_200_OK)
    if request.method == \"POST\":
        # Updates a pet in the store with form data
        return Response(status=status.HTTP_200_OK)
    if request.method == \"DELETE\":
        # Deletes a pet
        return Response(status=status.HTTP_200_OK)",
  );
}

#[test]
fn test_view_for_list_responses_and_bodies() {
  let (_, views) = petstore_files();
  assert_contains(
    &views,
    "def find_pets_by_status(request):
    if request.method == \"GET\":
        # Finds Pets by status
        values = []
        serializer = PetSerializer(values, many=True)
        return Response(serializer.data, status=status.HTTP_200_OK)",
  );
  assert_contains(
    &views,
    "        serializer = UserSerializer(data=request.data, many=True)",
  );
}

#[test]
fn test_view_without_named_response_schema() {
  let (_, views) = petstore_files();
  assert_contains(
    &views,
    "def get_inventory(request):
    if request.method == \"GET\":
        # Returns pet inventories by status
        return Response({}, status=status.HTTP_200_OK)",
  );
}

#[test]
fn test_status_constant() {
  assert_eq!(status_constant(StatusCode::OK), "status.HTTP_200_OK");
  assert_eq!(status_constant(StatusCode::CREATED), "status.HTTP_201_CREATED");
  assert_eq!(status_constant(StatusCode::NO_CONTENT), "status.HTTP_204_NO_CONTENT");
  assert_eq!(
    status_constant(StatusCode::NON_AUTHORITATIVE_INFORMATION),
    "status.HTTP_203_NON_AUTHORITATIVE_INFORMATION"
  );
  assert_eq!(status_constant(StatusCode::MULTI_STATUS), "status.HTTP_207_MULTI_STATUS");
  assert_eq!(status_constant(StatusCode::IM_A_TEAPOT), "status.HTTP_418_IM_A_TEAPOT");
  assert_eq!(
    status_constant(StatusCode::HTTP_VERSION_NOT_SUPPORTED),
    "status.HTTP_505_HTTP_VERSION_NOT_SUPPORTED"
  );
  assert_eq!(
    status_constant(StatusCode::from_u16(299).expect("valid status code")),
    "299"
  );
}
